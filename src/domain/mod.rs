// Core model and transformation for rmlog.

pub mod comments;
pub mod rules;
pub mod serializer;
pub mod syntax;
pub mod walker;
