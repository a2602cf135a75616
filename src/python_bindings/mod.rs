//! Provides tools and interfaces to integrate the crate's functionality with Python.

use std::sync::Arc;

use bincode::{config, Decode, Encode};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::automaton::AutomatonSnapshot;
use crate::convert::{Config, Conversion, Converter};

#[pyclass(name = "Conversion", module = "nfa_regex.nfa_regex_rs")]
#[derive(Clone, Debug, PartialEq, Encode, Decode)]
pub struct PyConversion(Arc<Conversion>);

#[pymethods]
impl PyConversion {
    #[getter]
    fn regex(&self) -> String {
        self.0.get_regex().to_string()
    }

    #[getter]
    fn trace(&self) -> Vec<String> {
        self.0.get_trace().iter().map(ToString::to_string).collect()
    }

    fn __repr__(&self) -> String {
        format!("{:#?}", self.0)
    }

    fn __str__(&self) -> String {
        format!("{}", self.0)
    }

    fn __eq__(&self, other: &PyConversion) -> bool {
        *self.0 == *other.0
    }

    fn __deepcopy__(&self, _py: Python<'_>, _memo: Py<PyDict>) -> Self {
        PyConversion(Arc::new((*self.0).clone()))
    }

    fn __reduce__(&self) -> PyResult<(PyObject, (Vec<u8>,))> {
        Python::with_gil(|py| {
            let cls = PyModule::import(py, "nfa_regex.nfa_regex_rs")?.getattr("Conversion")?;
            let binary_data: Vec<u8> = bincode::encode_to_vec(&self.0, config::standard())
                .map_err(|e| {
                    PyErr::new::<PyValueError, _>(format!(
                        "Serialization of Conversion failed: {}",
                        e
                    ))
                })?;
            Ok((cls.getattr("from_binary")?.unbind(), (binary_data,)))
        })
    }

    #[staticmethod]
    fn from_binary(binary_data: Vec<u8>) -> PyResult<Self> {
        let (conversion, _): (Conversion, usize) =
            bincode::decode_from_slice(&binary_data[..], config::standard()).map_err(|e| {
                PyErr::new::<PyValueError, _>(format!(
                    "Deserialization of Conversion failed: {}",
                    e
                ))
            })?;
        Ok(PyConversion(Arc::new(conversion)))
    }
}

#[pyfunction]
#[pyo3(signature = (states, alphabet, initial, finals, transitions, max_regex_len=None))]
fn nfa_to_regex(
    py: Python<'_>,
    states: Vec<String>,
    alphabet: Vec<String>,
    initial: Option<String>,
    finals: Vec<String>,
    transitions: Vec<(String, String, String)>,
    max_regex_len: Option<usize>,
) -> PyResult<PyConversion> {
    let snapshot = AutomatonSnapshot {
        states,
        alphabet,
        initial,
        finals,
        transitions,
    };
    py.allow_threads(|| {
        Converter::with_config(Config::new().max_regex_len(max_regex_len))
            .convert_snapshot(&snapshot)
            .map(|x| PyConversion(Arc::new(x)))
            .map_err(Into::into)
    })
}

#[pymodule]
fn nfa_regex_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyConversion>()?;
    m.add_function(wrap_pyfunction!(nfa_to_regex, m)?)?;

    Ok(())
}
