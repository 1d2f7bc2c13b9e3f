//! Python entry points for orchestration hosts that load the tool as a module.

use pyo3::{exceptions::PyValueError, prelude::*};
use serde_json::Value;

use crate::{schemas::InputSchema, tool};

fn to_json(py: Python<'_>, value: &Bound<'_, PyAny>) -> PyResult<String> {
    py.import("json")?.call_method1("dumps", (value,))?.extract()
}

fn from_json<'py>(py: Python<'py>, payload: &str) -> PyResult<Bound<'py, PyAny>> {
    py.import("json")?.call_method1("loads", (payload,))
}

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Run the tool for a module-run dict. Conversion failures come back as
/// `{"error": ...}`; an unknown tool name raises `ValueError`.
#[pyfunction]
fn run<'py>(py: Python<'py>, module_run: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyAny>> {
    let payload = to_json(py, module_run)?;
    let module_run: Value = serde_json::from_str(&payload).map_err(value_error)?;

    let result = tool::run_json(module_run).map_err(value_error)?;
    let rendered = serde_json::to_string(&result).map_err(value_error)?;
    from_json(py, &rendered)
}

#[pyfunction]
fn input_schema(py: Python<'_>) -> PyResult<Bound<'_, PyAny>> {
    from_json(py, &InputSchema::json_schema().to_string())
}

#[pymodule]
fn _lib(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(run, m)?)?;
    m.add_function(wrap_pyfunction!(input_schema, m)?)?;
    Ok(())
}
