//! Native build driving.
//!
//! [`cmake`] holds the native tool seam and its CMake implementation;
//! [`driver`] sequences configure and build with typed phase tokens.

pub mod cmake;
pub mod driver;

pub use cmake::{CMakeTool, NativeBuildTool, ToolOutput};
pub use driver::{BuildDriver, Built, Configured};
