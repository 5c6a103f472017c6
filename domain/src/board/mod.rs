//! Board result domain: the structured outcome of a deliberation.

pub mod entities;
