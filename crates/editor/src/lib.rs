// Library crate: the editor service, command protocol and picking math.
// The binary is a thin stdin/stdout driver over `command`.

pub mod command;
pub mod picking;
pub mod state;
