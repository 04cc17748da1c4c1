//! The Standard Security Handler: password authentication entry points.

use log::debug;
use zeroize::Zeroizing;

use crate::decrypt::{AccessLevel, DecryptionResult};
use crate::error::{PdfCryptoError, PdfCryptoResult};
use crate::pdf::EncryptionDictionary;
use crate::security::authentication::{
    authenticate_owner_r4, authenticate_owner_r6, authenticate_user_r4, authenticate_user_r6,
};

/// Password-based security handler over a validated encryption dictionary
/// and the first element of the document's file identifier.
#[derive(Debug, Clone)]
pub struct StandardSecurityHandler {
    dict: EncryptionDictionary,
    file_id: Vec<u8>,
}

impl StandardSecurityHandler {
    /// Validates the dictionary up front; a document that fails validation
    /// never reaches authentication.
    pub fn new(dict: EncryptionDictionary, file_id: Vec<u8>) -> PdfCryptoResult<Self> {
        dict.validate()?;
        Ok(StandardSecurityHandler { dict, file_id })
    }

    pub fn dictionary(&self) -> &EncryptionDictionary {
        &self.dict
    }

    /// Try a password as the user password (Algorithms 6 and 11).
    pub fn authenticate_user_password(
        &self,
        password: &[u8],
    ) -> PdfCryptoResult<DecryptionResult> {
        debug!(
            "Trying user password against revision {} dictionary",
            self.dict.r
        );
        let key = self.run_user_check(password)?;
        self.finish(AccessLevel::UserAccess, key)
    }

    /// Try a password as the owner password (Algorithms 7 and 12).
    pub fn authenticate_owner_password(
        &self,
        password: &[u8],
    ) -> PdfCryptoResult<DecryptionResult> {
        debug!(
            "Trying owner password against revision {} dictionary",
            self.dict.r
        );
        let key = match self.dict.r {
            2..=4 => authenticate_owner_r4(&self.dict, &self.file_id, password)?,
            5 | 6 => authenticate_owner_r6(&self.dict, password)?,
            r => return Err(PdfCryptoError::UnsupportedRevision(r)),
        };
        self.finish(AccessLevel::OwnerAccess, key)
    }

    /// Try a password first as the owner password, then as the user
    /// password, reporting the highest access level it grants.
    pub fn authenticate(&self, password: &[u8]) -> PdfCryptoResult<DecryptionResult> {
        let result = self.authenticate_owner_password(password)?;
        if result.is_authenticated() {
            return Ok(result);
        }
        self.authenticate_user_password(password)
    }

    fn run_user_check(&self, password: &[u8]) -> PdfCryptoResult<Option<Zeroizing<Vec<u8>>>> {
        match self.dict.r {
            2..=4 => authenticate_user_r4(&self.dict, &self.file_id, password),
            5 | 6 => authenticate_user_r6(&self.dict, password),
            r => Err(PdfCryptoError::UnsupportedRevision(r)),
        }
    }

    fn finish(
        &self,
        level: AccessLevel,
        key: Option<Zeroizing<Vec<u8>>>,
    ) -> PdfCryptoResult<DecryptionResult> {
        match key {
            Some(key) => {
                debug!("Password accepted, access level {:?}", level);
                DecryptionResult::granted(level, &self.dict, key)
            }
            None => {
                debug!("Password rejected");
                Ok(DecryptionResult::failed(&self.dict))
            }
        }
    }
}
