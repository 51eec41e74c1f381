//! REST clients (cold path, startup and tooling only)

pub mod discovery;

pub use discovery::{find_triangles, DiscoveryError, SymbolInfo, TriangleCandidate, TriangleDiscovery};
