pub mod rugplay;
