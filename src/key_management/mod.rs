pub mod key_storage;

// Réexportations key_storage
pub use key_storage::{
    GroupParamsJson, PublicKeyJson, PrivateKeyJson, KeyPairJson, KeyshareJson, ShareholderJson,
    MAX_KEY_FILE_BYTES, MAX_HEX_FIELD_LEN,
    biguint_to_hex, hex_to_biguint,
    params_to_json, public_key_to_json, private_key_to_json, keypair_to_json, keyshare_to_json,
    json_to_params, json_to_public_key, json_to_private_key, json_to_keypair, json_to_keyshare,
    save_params_json, save_keypair_json, save_shareholder_json,
    load_params_json, load_keypair_json, load_shareholder_json,
    key_file_exists, ensure_keys_directory,
};
