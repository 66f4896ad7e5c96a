//! Parse delimiter-separated text one physical line at a time
//!
//! Every line is split by [`tokenize`](tokenize::tokenize), optionally
//! checked by a [`RowSchema`](validate::RowSchema), and either collected in
//! one go ([`batch`]) or handed out lazily ([`stream`]). Quoted fields never
//! span lines: a quote left open at the end of a line is an error.
pub mod batch;
pub mod columns;
pub mod options;
pub mod report;
pub mod source;
pub mod stream;
pub mod tokenize;
pub mod validate;
