//! Test suites spanning several modules
//!
//! Unit tests live next to the code they test. The suites here exercise the
//! block model, registry, copy operator and statistics together, the async
//! service against real stores, and the invariants as properties.
