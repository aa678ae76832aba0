use pkparse::cipher;
use pktools::{decrypt, inspect};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const TABLES_JSON: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../tests/data/", "tables.json");

fn pelipper_canonical() -> Vec<u8> {
    let mut data = vec![0u8; 232];
    data[0x00..0x04].copy_from_slice(&0x5E1F_7A93u32.to_le_bytes());
    data[0x08..0x0A].copy_from_slice(&279u16.to_le_bytes());
    data[0x10..0x14].copy_from_slice(&14319u32.to_le_bytes());
    data[0x1C] = 15;
    data[0xDA..0xDC].copy_from_slice(&204u16.to_le_bytes());
    data[0xDF] = 27;
    let sum = cipher::checksum(&data);
    data[0x06..0x08].copy_from_slice(&sum.to_le_bytes());
    data
}

fn create_temp_pk6(data: &[u8]) -> NamedTempFile {
    let mut pk6 = NamedTempFile::new().unwrap();
    pk6.write_all(data).unwrap();
    pk6.flush().unwrap();
    pk6
}

#[test]
fn test_inspect_with_names() {
    let pk6 = create_temp_pk6(&cipher::encrypt(&pelipper_canonical()).unwrap());
    let opts = inspect::Opts {
        pk6: PathBuf::from(pk6.path()),
        names: true,
        tables: None,
        pretty: false,
    };

    let json = inspect::render(&opts, Some(PathBuf::from(TABLES_JSON))).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["speciesName"], "Pelipper");
    assert_eq!(value["natureName"], "Modest");
    assert_eq!(value["metLocationName"], "Route 118");
    assert_eq!(value["level"], 24);
    assert_eq!(value["checksumValid"], true);
}

#[test]
fn test_inspect_without_names() {
    let pk6 = create_temp_pk6(&cipher::encrypt(&pelipper_canonical()).unwrap());
    let opts = inspect::Opts {
        pk6: PathBuf::from(pk6.path()),
        names: false,
        tables: None,
        pretty: true,
    };

    let json = inspect::render(&opts, None).unwrap();
    assert!(json.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["speciesId"], 279);
    assert!(value.get("speciesName").is_none());
    assert_eq!(value["level"], serde_json::Value::Null);
}

#[test]
fn test_inspect_rejects_truncated_record() {
    let pk6 = create_temp_pk6(&[0u8; 100]);
    let opts = inspect::Opts {
        pk6: PathBuf::from(pk6.path()),
        names: false,
        tables: None,
        pretty: false,
    };
    assert!(inspect::render(&opts, None).is_err());
}

#[test]
fn test_tables_path_precedence() {
    let flag = Some(PathBuf::from("flag.json"));
    let env = Some("env.json".into());
    assert_eq!(
        inspect::tables_path(flag.clone(), env.clone()),
        Some(PathBuf::from("flag.json"))
    );
    assert_eq!(inspect::tables_path(None, env), Some(PathBuf::from("env.json")));
    assert_eq!(inspect::tables_path(None, Some("".into())), None);
    assert_eq!(inspect::tables_path(None, None), None);
}

#[test]
fn test_decrypt_writes_canonical_record() {
    let canonical = pelipper_canonical();
    let pk6 = create_temp_pk6(&cipher::encrypt(&canonical).unwrap());
    let output = NamedTempFile::new().unwrap();

    decrypt::run(decrypt::Opts {
        pk6: PathBuf::from(pk6.path()),
        dest: PathBuf::from(output.path()),
    })
    .unwrap();

    let written = std::fs::read(output.path()).unwrap();
    assert_eq!(written.len(), canonical.len());
    for (idx, (written, expected)) in written.into_iter().zip(canonical).enumerate() {
        assert_eq!(written, expected, "Records did not match, starting at idx {}", idx);
    }
}
