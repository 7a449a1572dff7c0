//! # metaphor-parser
//!
//! A compiler front-end for Metaphor, an indentation-structured
//! prompt-specification language. The library turns a root source file
//! (plus any `Include:`d Metaphor files and `Embed:`ded verbatim files)
//! into a section-numbered plain-text rendering.
//!
//! The pipeline is: lex → parse (with include/embed resolution) →
//! simplify (paragraph assembly) → render. See the [`metaphor`] module
//! for the individual stages and [`metaphor::pipeline`] for the
//! one-call driver.

pub mod metaphor;
