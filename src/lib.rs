//! # opcpp
//!
//! A structural source-to-source parser for the opC++ dialect.
//!
//! opC++ embeds custom syntactic extensions (object and enum declarations,
//! per-project "dialects" describing code-generation rules) in ordinary C++
//! text. This crate implements the front half of the translator: a generic
//! structural rewriting engine that turns a flat token sequence into a nested
//! tree by repeatedly recognizing syntactic patterns and replacing matched
//! spans with structured nodes, plus the concrete opC++ grammars built on it.
//!
//! The engine is deliberately small and uniform:
//!
//!   - every tree element is a [Node](opcpp::node::Node) with a kind tag, an
//!     ordered child list and a node-local cursor
//!   - every grammar is an ordered list of recognizer passes built from a
//!     fixed vocabulary of movement/rewrite primitives
//!   - every block grammar partitions its children with the same
//!     priority-ordered statement loop
//!
//! See the [pipeline](opcpp::pipeline) module for the entry points.

pub mod opcpp;
