//! Relgraph core library.
//!
//! Converts between five interchangeable sparse-relation representations
//! ([`Graph`], [`SparseMatrix`], [`BitMatrix`], the [`Table`] family and
//! [`BinaryKeyMap`]) and synthesises random graphs. Everything runs
//! in memory on the calling thread.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod capacity;
pub mod convert;
mod error;
pub mod generate;
mod mapping;
mod relation;
mod sampler;

#[cfg(test)]
mod test_utils;

pub use crate::{
    error::{RelgraphError, RelgraphErrorCode, Result, SamplerError, SamplerErrorCode},
    generate::{GenerationSummary, GeneratorParams, GraphGenerator},
    mapping::{IdentityMapping, IndexMapping, KeyLookup, ListMapping, MapMapping},
    relation::{
        ArrayTable, BinaryKeyMap, BitMatrix, Dimensions, Edge, EdgeId, Graph, HashTable,
        ImmutableTable, ImmutableTableBuilder, Node, NodeId, Relation, SparseMatrix, Table,
    },
    sampler::WeightedSampler,
};
