// Adapters layer: concrete implementations of the domain ports over HTTP.

pub mod http;

pub use http::{HttpImageProbe, HttpQuoteService, HttpSymptomService};
