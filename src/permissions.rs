//! Permission flags decoded from the encryption dictionary's P entry

use bitflags::bitflags;

bitflags! {
    /// PDF user access permissions at the bit positions defined by the format.
    ///
    /// The P entry is stored as a signed 32-bit integer; reserved bits carry
    /// no named flags and are dropped when decoding with
    /// [`Permissions::from_p_value`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Permissions: u32 {
        /// Print the document (bit 3)
        const PRINT = 1 << 2;
        /// Modify document contents (bit 4)
        const MODIFY = 1 << 3;
        /// Copy text and graphics (bit 5)
        const COPY_AND_EXTRACT = 1 << 4;
        /// Add or modify annotations (bit 6)
        const ANNOTATIONS = 1 << 5;
        /// Fill interactive form fields (bit 9)
        const INTERACTIVE_FORM_FIELDS = 1 << 8;
        /// Extract text and graphics for accessibility (bit 10)
        const EXTRACT_TEXT_AND_GRAPHICS = 1 << 9;
        /// Assemble the document (bit 11)
        const ASSEMBLE_DOCUMENT = 1 << 10;
        /// Print in high quality (bit 12)
        const PRINT_HIGH_QUALITY = 1 << 11;
    }
}

impl Permissions {
    /// Decode the signed P value, dropping reserved bits.
    pub fn from_p_value(p: i32) -> Self {
        Self::from_bits_truncate(p as u32)
    }
}
