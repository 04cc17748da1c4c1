//! Encryption dictionary view and generic dictionary values
//!
//! Parsing PDF syntax is out of scope here; the host library hands over an
//! already-parsed [`Dictionary`] and this module builds the typed
//! [`EncryptionDictionary`] view from it and enforces the revision-dependent
//! invariants.

use std::collections::HashMap;

use crate::error::{PdfCryptoError, PdfCryptoResult};
use crate::EncryptionMethod;

/// Generic PDF dictionary as supplied by the host object reader
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: HashMap<String, Value>,
}

/// Dictionary value types
#[derive(Debug, Clone)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Name(String),
    String(Vec<u8>),
    Array(Vec<Value>),
    Dictionary(Box<Dictionary>),
}

impl Dictionary {
    /// Create new empty dictionary
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Get value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Set value
    pub fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    /// Get integer value
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(Value::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    /// Get boolean value
    pub fn get_boolean(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(Value::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    /// Get name value
    pub fn get_name(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Value::Name(n)) => Some(n),
            _ => None,
        }
    }

    /// Get string value as raw bytes
    pub fn get_bytes(&self, key: &str) -> Option<&[u8]> {
        match self.get(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Get nested dictionary value
    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        match self.get(key) {
            Some(Value::Dictionary(d)) => Some(d),
            _ => None,
        }
    }

    /// Iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

/// A named crypt filter from the CF dictionary
#[derive(Debug, Clone)]
pub struct CryptFilter {
    /// CFM method name: V2, AESV2, AESV3 or None
    pub method: String,
    /// Key length in bits, when declared on the filter
    pub length: Option<u16>,
    /// AuthEvent name, when present
    pub auth_event: Option<String>,
}

/// Typed view of the /Encrypt dictionary
#[derive(Debug, Clone)]
pub struct EncryptionDictionary {
    /// Security handler name; only "Standard" is supported
    pub filter: String,
    /// Algorithm version V (1, 2, 4 or 5)
    pub v: u8,
    /// Revision R (2 through 6)
    pub r: u8,
    /// Key length in bits when present; defaults to 40
    pub length: Option<u16>,
    /// Owner value blob (32 bytes for R <= 4, 48 for R >= 5)
    pub o: Vec<u8>,
    /// User value blob (32 bytes for R <= 4, 48 for R >= 5)
    pub u: Vec<u8>,
    /// Owner key-encryption ciphertext (R >= 5 only, 32 bytes)
    pub oe: Option<Vec<u8>>,
    /// User key-encryption ciphertext (R >= 5 only, 32 bytes)
    pub ue: Option<Vec<u8>>,
    /// Encrypted permissions block (R >= 5, 16 bytes)
    pub perms: Option<Vec<u8>>,
    /// Signed permission mask, exactly as stored in the file
    pub p: i32,
    /// Whether document metadata is encrypted; defaults to true
    pub encrypt_metadata: bool,
    /// Named crypt filters from CF
    pub crypt_filters: HashMap<String, CryptFilter>,
    /// Crypt filter governing stream bodies (StmF)
    pub stream_filter: String,
    /// Crypt filter governing string values (StrF)
    pub string_filter: String,
}

impl Default for EncryptionDictionary {
    fn default() -> Self {
        Self {
            filter: "Standard".to_string(),
            v: 1,
            r: 2,
            length: None,
            o: Vec::new(),
            u: Vec::new(),
            oe: None,
            ue: None,
            perms: None,
            p: -1,
            encrypt_metadata: true,
            crypt_filters: HashMap::new(),
            stream_filter: "Identity".to_string(),
            string_filter: "Identity".to_string(),
        }
    }
}

impl EncryptionDictionary {
    /// Build the typed view from an already-parsed /Encrypt dictionary.
    pub fn from_dict(dict: &Dictionary) -> PdfCryptoResult<Self> {
        let filter = dict
            .get_name("Filter")
            .ok_or_else(|| PdfCryptoError::MissingDictionaryEntry("Filter".to_string()))?
            .to_string();

        let v = dict
            .get_integer("V")
            .ok_or_else(|| PdfCryptoError::MissingDictionaryEntry("V".to_string()))?
            as u8;
        let r = dict
            .get_integer("R")
            .ok_or_else(|| PdfCryptoError::MissingDictionaryEntry("R".to_string()))?
            as u8;

        let o = dict
            .get_bytes("O")
            .ok_or_else(|| PdfCryptoError::MissingDictionaryEntry("O".to_string()))?
            .to_vec();
        let u = dict
            .get_bytes("U")
            .ok_or_else(|| PdfCryptoError::MissingDictionaryEntry("U".to_string()))?
            .to_vec();

        let p = dict
            .get_integer("P")
            .ok_or_else(|| PdfCryptoError::MissingDictionaryEntry("P".to_string()))?
            as i32;

        let mut crypt_filters = HashMap::new();
        if let Some(cf) = dict.get_dict("CF") {
            for (name, value) in cf.iter() {
                let Value::Dictionary(entry) = value else {
                    return Err(PdfCryptoError::MalformedDictionary(format!(
                        "CF entry {name} is not a dictionary"
                    )));
                };
                let method = entry
                    .get_name("CFM")
                    .unwrap_or("Identity")
                    .to_string();
                crypt_filters.insert(
                    name.clone(),
                    CryptFilter {
                        method,
                        length: entry.get_integer("Length").map(|n| n as u16),
                        auth_event: entry.get_name("AuthEvent").map(str::to_string),
                    },
                );
            }
        }

        Ok(Self {
            filter,
            v,
            r,
            length: dict.get_integer("Length").map(|n| n as u16),
            o,
            u,
            oe: dict.get_bytes("OE").map(<[u8]>::to_vec),
            ue: dict.get_bytes("UE").map(<[u8]>::to_vec),
            perms: dict.get_bytes("Perms").map(<[u8]>::to_vec),
            p,
            encrypt_metadata: dict.get_boolean("EncryptMetadata").unwrap_or(true),
            crypt_filters,
            stream_filter: dict.get_name("StmF").unwrap_or("Identity").to_string(),
            string_filter: dict.get_name("StrF").unwrap_or("Identity").to_string(),
        })
    }

    /// Enforce the revision-dependent invariants on the dictionary.
    pub fn validate(&self) -> PdfCryptoResult<()> {
        if self.filter != "Standard" {
            return Err(PdfCryptoError::UnsupportedFilter(self.filter.clone()));
        }

        // V 0 is undocumented and V 3 unpublished; neither may appear in a
        // conforming file.
        match self.v {
            1 | 2 | 4 | 5 => {}
            v => return Err(PdfCryptoError::UnsupportedVersion(v)),
        }
        if !(2..=6).contains(&self.r) {
            return Err(PdfCryptoError::UnsupportedRevision(self.r));
        }

        if self.r >= 5 && self.v != 5 {
            return Err(PdfCryptoError::MalformedDictionary(format!(
                "revision {} requires version 5, found {}",
                self.r, self.v
            )));
        }
        if self.r <= 4 && self.v == 5 {
            return Err(PdfCryptoError::MalformedDictionary(format!(
                "version 5 requires revision 5 or 6, found {}",
                self.r
            )));
        }

        let value_len = if self.r >= 5 { 48 } else { 32 };
        if self.o.len() != value_len {
            return Err(PdfCryptoError::InvalidValueLength {
                field: "O",
                expected: value_len,
                actual: self.o.len(),
            });
        }
        if self.u.len() != value_len {
            return Err(PdfCryptoError::InvalidValueLength {
                field: "U",
                expected: value_len,
                actual: self.u.len(),
            });
        }

        if self.r >= 5 {
            let oe = self
                .oe
                .as_deref()
                .ok_or_else(|| PdfCryptoError::MissingDictionaryEntry("OE".to_string()))?;
            if oe.len() != 32 {
                return Err(PdfCryptoError::InvalidValueLength {
                    field: "OE",
                    expected: 32,
                    actual: oe.len(),
                });
            }
            let ue = self
                .ue
                .as_deref()
                .ok_or_else(|| PdfCryptoError::MissingDictionaryEntry("UE".to_string()))?;
            if ue.len() != 32 {
                return Err(PdfCryptoError::InvalidValueLength {
                    field: "UE",
                    expected: 32,
                    actual: ue.len(),
                });
            }
            if let Some(perms) = self.perms.as_deref() {
                if perms.len() != 16 {
                    return Err(PdfCryptoError::InvalidValueLength {
                        field: "Perms",
                        expected: 16,
                        actual: perms.len(),
                    });
                }
            }
        }

        if let Some(length) = self.length {
            let valid = match self.v {
                1 => length == 40,
                2 => length % 8 == 0 && (40..=128).contains(&length),
                4 => length == 128,
                5 => length == 256,
                _ => false,
            };
            if !valid {
                return Err(PdfCryptoError::UnsupportedKeyLength(length as usize));
            }
        }

        Ok(())
    }

    /// File encryption key length in bits.
    pub fn key_length_bits(&self) -> u16 {
        match self.v {
            2 => self.length.unwrap_or(40),
            4 => 128,
            5 => 256,
            _ => 40,
        }
    }

    /// File encryption key length in bytes.
    pub fn key_length_bytes(&self) -> usize {
        self.key_length_bits() as usize / 8
    }

    /// Resolve the cipher applied to stream bodies.
    pub fn stream_method(&self) -> PdfCryptoResult<EncryptionMethod> {
        self.resolve_method(&self.stream_filter)
    }

    /// Resolve the cipher applied to string values.
    pub fn string_method(&self) -> PdfCryptoResult<EncryptionMethod> {
        self.resolve_method(&self.string_filter)
    }

    fn resolve_method(&self, filter_name: &str) -> PdfCryptoResult<EncryptionMethod> {
        match self.v {
            // V 1/2 predate crypt filters; everything is RC4.
            1 | 2 => Ok(EncryptionMethod::Rc4),
            4 | 5 => {
                if filter_name == "Identity" {
                    return Ok(EncryptionMethod::None);
                }
                let cf = self
                    .crypt_filters
                    .get(filter_name)
                    .ok_or_else(|| PdfCryptoError::UnknownCryptFilter(filter_name.to_string()))?;
                match cf.method.as_str() {
                    "V2" => Ok(EncryptionMethod::Rc4),
                    "AESV2" | "AESV3" => Ok(EncryptionMethod::Aes),
                    "None" | "Identity" => Ok(EncryptionMethod::None),
                    other => Err(PdfCryptoError::UnsupportedCryptFilterMethod(
                        other.to_string(),
                    )),
                }
            }
            v => Err(PdfCryptoError::UnsupportedVersion(v)),
        }
    }
}
