//! Cross-crate tests for the mission escrow and registry contracts live in `tests/`.
