//! End-to-end authentication and decryption scenarios built from
//! self-constructed encryption dictionaries.

use pdf_security::crypto::encrypt_aes256;
use pdf_security::security::{
    compute_owner_value, compute_owner_values_r6, compute_permissions_value, compute_user_value,
    compute_user_values_r6,
};
use pdf_security::{
    AccessLevel, CryptFilter, DecryptionResult, Dictionary, EncryptionDictionary,
    EncryptionMethod, ObjectId, PdfStream, PdfString, StandardSecurityHandler,
};
use pretty_assertions::assert_eq;
use test_log::test;

const FILE_ID: &[u8] = &[0x9A, 0x1B, 0x33, 0x07, 0x42, 0x55, 0x68, 0x7C];

fn crypt_filtered_dict(method: &str, user_pw: &[u8], owner_pw: &[u8]) -> EncryptionDictionary {
    let mut dict = EncryptionDictionary {
        v: 4,
        r: 4,
        length: Some(128),
        p: -3904,
        stream_filter: "StdCF".to_string(),
        string_filter: "StdCF".to_string(),
        ..Default::default()
    };
    dict.crypt_filters.insert(
        "StdCF".to_string(),
        CryptFilter {
            method: method.to_string(),
            length: Some(16),
            auth_event: Some("DocOpen".to_string()),
        },
    );
    dict.o = compute_owner_value(owner_pw, user_pw, dict.r, 16).unwrap();
    dict.u = compute_user_value(
        user_pw,
        &dict.o,
        dict.p,
        FILE_ID,
        dict.r,
        16,
        dict.encrypt_metadata,
    )
    .unwrap();
    dict
}

fn aes256_dict(user_pw: &[u8], owner_pw: &[u8], file_key: &[u8; 32]) -> EncryptionDictionary {
    let mut dict = EncryptionDictionary {
        v: 5,
        r: 6,
        length: Some(256),
        p: -3904,
        stream_filter: "StdCF".to_string(),
        string_filter: "StdCF".to_string(),
        ..Default::default()
    };
    dict.crypt_filters.insert(
        "StdCF".to_string(),
        CryptFilter {
            method: "AESV3".to_string(),
            length: Some(32),
            auth_event: Some("DocOpen".to_string()),
        },
    );
    let (u, ue) = compute_user_values_r6(file_key, user_pw, dict.r).unwrap();
    let (o, oe) = compute_owner_values_r6(file_key, owner_pw, &u, dict.r).unwrap();
    dict.perms = Some(compute_permissions_value(dict.p, dict.encrypt_metadata, file_key).unwrap());
    dict.u = u;
    dict.ue = Some(ue);
    dict.o = o;
    dict.oe = Some(oe);
    dict
}

#[test]
fn aes128_document_open_and_decrypt() {
    let dict = crypt_filtered_dict("AESV2", b"OpenPW", b"ChangePW");
    let handler = StandardSecurityHandler::new(dict, FILE_ID.to_vec()).unwrap();

    let result = handler.authenticate_user_password(b"OpenPW").unwrap();
    assert_eq!(result.access_level(), AccessLevel::UserAccess);
    assert_eq!(result.key_length(), 128);
    assert_eq!(result.string_method(), EncryptionMethod::Aes);
    assert_eq!(result.stream_method(), EncryptionMethod::Aes);
    assert_eq!(result.encryption_key().unwrap().len(), 16);

    let result = handler.authenticate_owner_password(b"ChangePW").unwrap();
    assert_eq!(result.access_level(), AccessLevel::OwnerAccess);

    // Round-trip a string and a stream through the decryptor.
    let decryptor = result.get_decryptor().unwrap();
    let id = ObjectId::new(42, 0);
    let string = PdfString::literal(b"Title with special chars \x28\x29".to_vec());
    let encrypted = decryptor.encrypt_string(&string, id).unwrap();
    assert_ne!(encrypted.data, string.data);
    assert_eq!(decryptor.decrypt_string(&encrypted, id).unwrap().data, string.data);

    let stream = PdfStream::new(Dictionary::new(), vec![0x55; 300]);
    let encrypted = decryptor.encrypt_stream(&stream, id).unwrap();
    assert_eq!(decryptor.decrypt_stream(&encrypted, id).unwrap().data, stream.data);
}

#[test]
fn aes128_document_rejects_wrong_passwords() {
    let dict = crypt_filtered_dict("AESV2", b"OpenPW", b"ChangePW");
    let handler = StandardSecurityHandler::new(dict, FILE_ID.to_vec()).unwrap();

    for bad in [&b""[..], b"openpw", b"OpenPW ", b"ChangePW"] {
        let result = handler.authenticate_user_password(bad).unwrap();
        assert_eq!(result.access_level(), AccessLevel::Encrypted);
        assert!(result.encryption_key().is_none());
        assert!(result.get_decryptor().is_err());
    }
    // And the user password does not unlock owner access.
    let result = handler.authenticate_owner_password(b"OpenPW").unwrap();
    assert_eq!(result.access_level(), AccessLevel::Encrypted);
}

#[test]
fn v2_crypt_filter_uses_rc4() {
    let dict = crypt_filtered_dict("V2", b"user", b"owner");
    let handler = StandardSecurityHandler::new(dict, FILE_ID.to_vec()).unwrap();

    let result = handler.authenticate(b"user").unwrap();
    assert_eq!(result.access_level(), AccessLevel::UserAccess);
    assert_eq!(result.string_method(), EncryptionMethod::Rc4);
    assert_eq!(result.stream_method(), EncryptionMethod::Rc4);
    assert_eq!(result.encryption_key().unwrap().len(), 16);

    let decryptor = result.get_decryptor().unwrap();
    let id = ObjectId::new(7, 0);
    let string = PdfString::hexadecimal(b"rc4 payload".to_vec());
    let encrypted = decryptor.encrypt_string(&string, id).unwrap();
    let decrypted = decryptor.decrypt_string(&encrypted, id).unwrap();
    assert_eq!(decrypted.data, string.data);
}

#[test]
fn unencrypted_document_grants_everything() {
    let result = DecryptionResult::not_encrypted();
    assert_eq!(result.access_level(), AccessLevel::NotEncrypted);
    assert_eq!(result.permissions().bits(), 0b1111_1111_1100);
    assert_eq!(result.key_length(), 0);
    assert_eq!(result.string_method(), EncryptionMethod::None);
    assert_eq!(result.stream_method(), EncryptionMethod::None);

    let err = result.get_decryptor().unwrap_err();
    assert!(err.to_string().contains("not encrypted"));
}

#[test]
fn aes256_document_open_and_decrypt() {
    let file_key = [0xC4u8; 32];
    let dict = aes256_dict(b"reader", b"author", &file_key);
    let handler = StandardSecurityHandler::new(dict, Vec::new()).unwrap();

    let result = handler.authenticate(b"reader").unwrap();
    assert_eq!(result.access_level(), AccessLevel::UserAccess);
    assert_eq!(result.key_length(), 256);
    assert_eq!(result.encryption_key(), Some(&file_key[..]));

    let decryptor = result.get_decryptor().unwrap();
    let id = ObjectId::new(11, 2);
    let string = PdfString::literal("métadonnées".as_bytes().to_vec());
    let encrypted = decryptor.encrypt_string(&string, id).unwrap();
    assert_eq!(decryptor.decrypt_string(&encrypted, id).unwrap().data, string.data);

    // A string encrypted directly under the file key decrypts the same way;
    // revision 6 never mixes the object id into the key.
    let plaintext = b"direct file-key ciphertext";
    let ciphertext = encrypt_aes256(&file_key, plaintext).unwrap();
    let string = PdfString::hexadecimal(ciphertext);
    let decrypted = decryptor.decrypt_string(&string, ObjectId::new(999, 7)).unwrap();
    assert_eq!(decrypted.data, plaintext);

    // Owner access recovers the same file key.
    let result = handler.authenticate(b"author").unwrap();
    assert_eq!(result.access_level(), AccessLevel::OwnerAccess);
    assert_eq!(result.encryption_key(), Some(&file_key[..]));
}

#[test]
fn empty_strings_and_streams_pass_through() {
    let dict = crypt_filtered_dict("AESV2", b"user", b"owner");
    let handler = StandardSecurityHandler::new(dict, FILE_ID.to_vec()).unwrap();
    let decryptor = handler
        .authenticate(b"user")
        .unwrap()
        .get_decryptor()
        .unwrap();
    let id = ObjectId::new(1, 0);

    let string = PdfString::literal(Vec::new());
    assert!(decryptor.decrypt_string(&string, id).unwrap().data.is_empty());
    assert!(decryptor.encrypt_string(&string, id).unwrap().data.is_empty());

    let stream = PdfStream::new(Dictionary::new(), Vec::new());
    assert!(decryptor.decrypt_stream(&stream, id).unwrap().data.is_empty());
}
