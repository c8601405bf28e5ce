//! Workspace-level package; exists only to host pre-commit tooling.
//! See `package.metadata.rusty-hook` in the root `Cargo.toml`.
