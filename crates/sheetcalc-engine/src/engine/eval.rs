//! Rhai engine creation and formula evaluation.
//!
//! Formulas never reach Rhai as typed: they are tokenized and lowered first
//! (see [`Formula`]), references are resolved against the grid, and only the
//! lowered arithmetic is evaluated, with each reference bound as a scope
//! variable. Division is overridden so that dividing by zero is an error
//! instead of an infinity.

use rhai::{Engine, EvalAltResult, Position, Scope};

use super::cycle::{Group, ReferenceWalk, walk_grid};
use super::{CellType, CellValue, Formula, FormulaError, Grid};

/// Rhai expression depth limit. Lowered statements are at most two levels deep.
const MAX_EXPR_DEPTH: usize = 64;

/// Create a Rhai engine for evaluating formula arithmetic.
pub fn create_engine() -> Engine {
    let mut engine = Engine::new();
    engine.set_max_expr_depths(MAX_EXPR_DEPTH, MAX_EXPR_DEPTH);
    // Required for the `/` override below to take precedence over the built-in.
    engine.set_fast_operators(false);
    engine.register_fn("/", |a: f64, b: f64| -> Result<f64, Box<EvalAltResult>> {
        if b == 0.0 {
            Err(EvalAltResult::ErrorArithmetic("Division by zero".into(), Position::NONE).into())
        } else {
            Ok(a / b)
        }
    });
    engine
}

/// Evaluate the arithmetic of a formula with references bound to numbers.
pub fn eval_formula(
    engine: &Engine,
    formula: &Formula,
    bindings: &[(String, f64)],
) -> Result<f64, FormulaError> {
    let script = formula.script().ok_or(FormulaError::MalformedExpression)?;

    let mut scope = Scope::new();
    for (name, value) in bindings {
        scope.push(name.clone(), *value);
    }

    engine
        .eval_with_scope::<f64>(&mut scope, script)
        .map_err(|err| match *err {
            EvalAltResult::ErrorArithmetic(..) => FormulaError::DivideByZero,
            _ => FormulaError::MalformedExpression,
        })
}

/// Evaluates cells of one grid, caching each result for the pass.
pub struct Evaluator<'a> {
    grid: &'a Grid,
    engine: &'a Engine,
    walk: ReferenceWalk<'a>,
    values: Vec<Option<CellValue>>,
}

impl<'a> Evaluator<'a> {
    pub fn new(grid: &'a Grid, engine: &'a Engine) -> Self {
        Evaluator {
            grid,
            engine,
            walk: ReferenceWalk::new(grid),
            values: vec![None; grid.len()],
        }
    }

    /// Evaluate one cell (and whatever it references).
    /// Returns None when the index is out of range.
    pub fn evaluate(&mut self, index: usize) -> Option<&CellValue> {
        if index >= self.grid.len() {
            return None;
        }
        let grid = self.grid;
        let engine = self.engine;
        let values = &mut self.values;
        self.walk
            .visit(index, |group| finish_group(grid, engine, values, group));
        self.values[index].as_ref()
    }

    /// Evaluate every cell of the grid.
    pub fn evaluate_all(self) -> Vec<CellValue> {
        let Evaluator {
            grid,
            engine,
            values: mut cached,
            ..
        } = self;
        walk_grid(grid, |group| finish_group(grid, engine, &mut cached, group));
        cached
            .into_iter()
            .map(|v| v.unwrap_or(CellValue::Error(FormulaError::Cycle)))
            .collect()
    }
}

fn finish_group(
    grid: &Grid,
    engine: &Engine,
    values: &mut [Option<CellValue>],
    group: &Group,
) {
    for &member in &group.members {
        if values[member].is_some() {
            continue;
        }
        let value = if group.cyclic {
            CellValue::Error(FormulaError::Cycle)
        } else {
            evaluate_cell(grid, engine, values, member)
        };
        values[member] = Some(value);
    }
}

/// Compute one cell whose references outside its own group are all finished.
fn evaluate_cell(
    grid: &Grid,
    engine: &Engine,
    values: &[Option<CellValue>],
    index: usize,
) -> CellValue {
    let cell = grid.cell(index);
    match cell.contents() {
        CellType::Text => CellValue::Text(cell.raw().to_string()),
        CellType::Number(n) => CellValue::Number(*n),
        CellType::Formula(formula) => match resolve_and_eval(grid, engine, values, formula) {
            Ok(n) => CellValue::Number(n),
            Err(err) => CellValue::Error(err),
        },
    }
}

fn resolve_and_eval(
    grid: &Grid,
    engine: &Engine,
    values: &[Option<CellValue>],
    formula: &Formula,
) -> Result<f64, FormulaError> {
    if !formula.is_valid() {
        return Err(FormulaError::MalformedExpression);
    }

    let mut bindings = Vec::with_capacity(formula.references().len());
    for reference in formula.references() {
        let index = reference
            .cell
            .as_ref()
            .and_then(|cell_ref| grid.index_of(cell_ref))
            .ok_or_else(|| FormulaError::InvalidReference(reference.name.clone()))?;

        let value = match &values[index] {
            Some(CellValue::Number(n)) => *n,
            Some(_) => return Err(FormulaError::NonNumericReference(reference.name.clone())),
            None => return Err(FormulaError::Cycle),
        };
        bindings.push((reference.name.clone(), value));
    }

    eval_formula(engine, formula, &bindings)
}
