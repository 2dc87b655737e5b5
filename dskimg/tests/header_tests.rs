//! Boot sector and Garmin header tests

mod common;

use common::DskimgBuilder;
use dskimg::header::{offsets, ImageMetadata};
use dskimg::mbr::{BootSector, CylinderHeadSector, Geometry, PartitionStatus, PartitionType};
use dskimg::{DskimgError, ErrorKind};

fn plain_sector() -> [u8; 512] {
    DskimgBuilder::new().header_sector()
}

#[test]
fn test_empty_partition_slots_are_absent() {
    let mut sector = [0u8; 512];
    sector[510] = 0x55;
    sector[511] = 0xAA;

    let boot = BootSector::parse(&sector).expect("parse");
    assert!(boot.partitions.iter().all(Option::is_none));
    assert_eq!(boot.partitions().count(), 0);
}

#[test]
fn test_bad_boot_signature() {
    let mut sector = plain_sector();
    sector[511] = 0x00;
    let err = BootSector::parse(&sector).expect_err("bad signature");
    assert_eq!(err, DskimgError::InvalidBootSignature);
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_short_boot_sector() {
    let err = BootSector::parse(&[0u8; 300]).expect_err("short");
    assert_eq!(
        err,
        DskimgError::Truncated {
            needed: 512,
            available: 300
        }
    );
}

#[test]
fn test_partition_entry_present() {
    let mut sector = plain_sector();
    let entry = &mut sector[446..462];
    entry[0] = 0x80;
    entry[1..4].copy_from_slice(&CylinderHeadSector::new(0, 1, 1).to_bytes());
    entry[4] = 0x00;
    entry[5..8].copy_from_slice(&CylinderHeadSector::new(0x12F, 3, 32).to_bytes());
    entry[8..12].copy_from_slice(&32u32.to_le_bytes());
    entry[12..16].copy_from_slice(&4096u32.to_le_bytes());

    let boot = BootSector::parse(&sector).expect("parse");
    let partition = boot.partitions[0].expect("slot 0");
    assert_eq!(partition.status, PartitionStatus::Active);
    assert!(partition.is_active());
    assert_eq!(partition.partition_type, PartitionType::Empty);
    assert_eq!(partition.last_sector, CylinderHeadSector::new(0x12F, 3, 32));
    assert_eq!(partition.first_lba, 32);
    assert_eq!(partition.sector_count, 4096);
    assert!(boot.partitions[1..].iter().all(Option::is_none));

    let geometry = Geometry::new(0x100, 4, 32);
    assert_eq!(geometry.to_lba(partition.first_sector), Some(32));
}

#[test]
fn test_partition_status_and_type_validation() {
    let mut sector = plain_sector();
    sector[446] = 0x7F;
    assert_eq!(
        BootSector::parse(&sector).expect_err("status"),
        DskimgError::InvalidPartitionStatus(0x7F)
    );

    let mut sector = plain_sector();
    sector[446 + 16 + 4] = 0x0C;
    assert_eq!(
        BootSector::parse(&sector).expect_err("type"),
        DskimgError::UnknownPartitionType(0x0C)
    );
}

#[test]
fn test_metadata_fields() {
    let sector = plain_sector();
    let meta = ImageMetadata::parse(&sector[..446]).expect("parse");

    assert_eq!(meta.version, 4);
    assert_eq!(meta.updated_at.year, 2023);
    assert_eq!(meta.updated_at.month, 6);
    assert_eq!(meta.created_at.year, 2021);
    assert_eq!(meta.created_at.month, 12);
    assert_eq!(meta.created_at.day, 24);
    assert_eq!(
        (meta.created_at.hour, meta.created_at.minute, meta.created_at.second),
        (13, 45, 30)
    );
    assert_eq!(meta.geometry, Geometry::new(0x100, 4, 32));
    assert_eq!(meta.fat_start_block, 1);
    assert_eq!(meta.fat_offset(), 512);
    assert_eq!(meta.description, "TEST MAP");
    assert_eq!(meta.data_block_size, 512);
    assert_eq!(meta.opaque.possible_heads, 4);
    assert_eq!(meta.opaque.possible_sectors, 32);
    assert_eq!(meta.opaque.geometry_related, 0x0800);
}

#[test]
fn test_update_year_pivot() {
    let mut sector = plain_sector();
    sector[offsets::UPDATE_YEAR] = 0x63;
    sector[offsets::UPDATE_MONTH] = 0;
    let meta = ImageMetadata::parse(&sector[..446]).expect("parse");
    assert_eq!(meta.updated_at.year, 1999);
    assert_eq!(meta.updated_at.month, 1);

    sector[offsets::UPDATE_YEAR] = 0x62;
    let meta = ImageMetadata::parse(&sector[..446]).expect("parse");
    assert_eq!(meta.updated_at.year, 2098);
}

#[test]
fn test_any_dskimg_signature_byte_altered() {
    for i in 0..7 {
        let mut sector = plain_sector();
        sector[offsets::DSKIMG + i] ^= 0x20;
        let err = ImageMetadata::parse(&sector[..446]).expect_err("altered signature");
        assert_eq!(err, DskimgError::InvalidDskimgSignature);
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}

#[test]
fn test_garmin_signature_altered() {
    let mut sector = plain_sector();
    sector[offsets::GARMIN + 6] = b'!';
    assert_eq!(
        ImageMetadata::parse(&sector[..446]).expect_err("altered signature"),
        DskimgError::InvalidGarminSignature
    );
}

#[test]
fn test_description_spans_both_regions() {
    let mut builder = DskimgBuilder::new();
    builder.description = "  OpenStreetMap Europe Topographic 2023".to_string();
    let sector = builder.header_sector();

    let meta = ImageMetadata::parse(&sector[..446]).expect("parse");
    assert_eq!(meta.description, "OpenStreetMap Europe Topographic 2023");
}

#[test]
fn test_split_block_size_exponent() {
    let mut builder = DskimgBuilder::new();
    builder.exponent_base = 9;
    builder.exponent_increment = 4;
    let meta = ImageMetadata::parse(&builder.header_sector()[..446]).expect("parse");
    assert_eq!(meta.data_block_size, 8192);

    builder.exponent_increment = 60;
    assert_eq!(
        ImageMetadata::parse(&builder.header_sector()[..446]).expect_err("too large"),
        DskimgError::InvalidBlockSize(69)
    );
}
