//! Typed views of the PDF values this crate consumes

mod dict;
mod object;

pub use dict::{CryptFilter, Dictionary, EncryptionDictionary, Value};
pub use object::{ObjectId, PdfStream, PdfString, StringFormat};
