mod common;

use common::{tables, RecordBuilder};
use pkparse::tables::Tables;
use pkparse::{decode, Decoded, EnrichedRecord, Options};

fn named(builder: RecordBuilder, tables: &Tables) -> EnrichedRecord {
    match decode(&builder.build(), &Options { parse_names: true }, tables).unwrap() {
        Decoded::Named(record) => record,
        Decoded::Plain(_) => panic!("asked for names but got a plain record"),
    }
}

#[test]
fn test_gen5_origin_uses_gen5_table() {
    let mienshao = named(
        RecordBuilder::new_box(0x3141_5926)
            .u16(0x08, 620)
            .u16(0xDA, 38)
            .u8(0xDF, 21),
        &tables(),
    );
    assert_eq!(mienshao.met_location_name.as_deref(), Some("Dragonspiral Tower"));
    assert_eq!(mienshao.egg_location_name, None);
    assert_eq!(mienshao.ot_game_name.as_deref(), Some("Black"));
}

#[test]
fn test_gen6_origin_uses_gen6_table() {
    let tables = tables();
    for game in [24u8, 25, 26, 27] {
        let record = named(
            RecordBuilder::new_box(0x2718_2818)
                .u16(0x08, 279)
                .u16(0xD8, 30001)
                .u16(0xDA, 204)
                .u8(0xDF, game),
            &tables,
        );
        assert_eq!(record.met_location_name.as_deref(), Some("Route 118"));
        assert_eq!(record.egg_location_name.as_deref(), Some("Link Trade"));
    }
}

#[test]
fn test_gen5_ids_do_not_leak_into_gen6_records() {
    let record = named(
        RecordBuilder::new_box(0x2718_2818)
            .u16(0xDA, 38)
            .u8(0xDF, 24),
        &tables(),
    );
    assert_eq!(record.met_location_name, None);
}

#[test]
fn test_pre_gen5_origin_uses_transfer_sentinels() {
    let tables = tables();
    let eevee = named(
        RecordBuilder::new_box(0x1620_3399)
            .u16(0x08, 133)
            .u16(0xDA, 30001)
            .u8(0xDF, 3)
            .u8(0x94, 3)
            .u8(0x95, 1),
        &tables,
    );
    assert_eq!(eevee.derived.raw.met_location_id, 30001);
    assert_eq!(eevee.met_location_name.as_deref(), Some("Poké Transfer"));
    assert_eq!(eevee.egg_location_name.as_deref(), Some("Day-Care Couple"));
    assert_eq!(
        eevee.geo_location_names[0].region_name.as_deref(),
        Some("Aomori")
    );
    assert_eq!(
        eevee.geo_location_names[0].country_name.as_deref(),
        Some("Japan")
    );
    assert_eq!(eevee.geo_location_names[1].country_name, None);

    // Stored ids are ignored, even ones a newer table would know.
    let kecleon = named(
        RecordBuilder::new_box(0x1620_3399)
            .u16(0x08, 352)
            .u16(0xD8, 30001)
            .u16(0xDA, 204)
            .u8(0xDF, 12),
        &tables,
    );
    assert_eq!(kecleon.met_location_name.as_deref(), Some("Poké Transfer"));
    assert_eq!(kecleon.egg_location_name.as_deref(), Some("Day-Care Couple"));
}

#[test]
fn test_transfer_sentinels_come_from_tables() {
    let tables = Tables::from_reader(
        r#"{"locations": {"transfer": "Transfer Lab", "dayCare": "Day Care"}}"#.as_bytes(),
    )
    .unwrap();
    let record = named(RecordBuilder::new_box(0x4444_0000).u8(0xDF, 15), &tables);
    assert_eq!(record.met_location_name.as_deref(), Some("Transfer Lab"));
    assert_eq!(record.egg_location_name.as_deref(), Some("Day Care"));
}

#[test]
fn test_unknown_origin_has_no_locations() {
    let tables = tables();
    for game in [0u8, 6, 9, 28, 200] {
        let record = named(
            RecordBuilder::new_box(0x9999_8888)
                .u16(0xD8, 30001)
                .u16(0xDA, 204)
                .u8(0xDF, game),
            &tables,
        );
        assert_eq!(record.met_location_name, None, "game id {game}");
        assert_eq!(record.egg_location_name, None, "game id {game}");
        assert_eq!(record.ot_game_name, None, "game id {game}");
    }
}
