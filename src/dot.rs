//! Circuit to DOT (Graphviz) conversion.
//!
//! # DOT Format
//!
//! The generated DOT output follows these conventions:
//! - **Inputs** `x1..xn` are rendered at the top (source rank)
//! - **Gates** are labelled with their index and type, e.g. `g2: NAND`
//! - **Connections** are directed edges from an input or gate to the gate it feeds
//! - **The output** `f` is attached to the last gate at the bottom (sink rank)
//!
//! # Examples
//!
//! ```
//! use muroga_rs::circuit::{Circuit, Connection};
//! use muroga_rs::gate::GateType;
//!
//! let circuit = Circuit::new(
//!     2,
//!     vec![GateType::Nand, GateType::Not],
//!     vec![Connection::input(1, 1), Connection::input(2, 1), Connection::gate(1, 2)],
//! )
//! .unwrap();
//!
//! let dot = circuit.to_dot().unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! assert!(dot.contains("g1 -> g2;"));
//! ```

use std::fmt::Write as _;

use crate::circuit::{Circuit, Source};

/// Configuration options for DOT output generation.
///
/// # Examples
///
/// ```
/// use muroga_rs::dot::DotConfig;
///
/// let config = DotConfig {
///     gate_shape: "circle",
///     ..DotConfig::default()
/// };
/// assert_eq!(config.input_shape, "plaintext");
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for external inputs (default: "plaintext")
    pub input_shape: &'static str,
    /// Shape for gates (default: "box")
    pub gate_shape: &'static str,
    /// Shape for the output terminal (default: "doublecircle")
    pub output_shape: &'static str,
    /// Use HTML-like labels for subscripts (default: false)
    pub use_html_labels: bool,
    /// Draw gates that nothing is connected to (default: true)
    pub show_unconnected: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            input_shape: "plaintext",
            gate_shape: "box",
            output_shape: "doublecircle",
            use_html_labels: false,
            show_unconnected: true,
        }
    }
}

fn node_id(source: Source) -> String {
    match source {
        Source::Input(e) => format!("x{}", e),
        Source::Gate(i) => format!("g{}", i),
    }
}

impl Circuit {
    /// Converts the circuit to DOT format with default configuration.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the circuit to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let num_gates = self.gates().len();
        let is_drawn = |k: usize| config.show_unconnected || k == num_gates || self.fan_in(k) > 0;

        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "rankdir=TB;")?;

        writeln!(dot, "{{ rank=source")?;
        for e in 1..=self.num_inputs() {
            let label = if config.use_html_labels {
                format!("<x<SUB>{}</SUB>>", e)
            } else {
                format!("\"x{}\"", e)
            };
            writeln!(dot, "x{} [shape={}, label={}];", e, config.input_shape, label)?;
        }
        writeln!(dot, "}}")?;

        for (index, gate) in self.gates().iter().enumerate() {
            let k = index + 1;
            if !is_drawn(k) {
                continue;
            }
            writeln!(dot, "g{} [shape={}, label=\"g{}: {}\"];", k, config.gate_shape, k, gate)?;
        }

        for c in self.connections() {
            writeln!(dot, "{} -> g{};", node_id(c.source), c.target)?;
        }

        writeln!(dot, "{{ rank=sink")?;
        writeln!(dot, "f [shape={}, label=\"f\"];", config.output_shape)?;
        writeln!(dot, "}}")?;
        writeln!(dot, "g{} -> f;", num_gates)?;

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
