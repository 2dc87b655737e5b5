//! In-memory DSKIMG image builder

/// One file to place in the image
#[derive(Debug, Clone)]
pub struct FileSpec {
    pub basename: String,
    pub extension: String,
    pub content: Vec<u8>,
}

/// Builds obfuscated DSKIMG images
pub struct DskimgBuilder {
    pub key: u8,
    pub exponent_base: u8,
    pub exponent_increment: u8,
    pub fat_start_block: u8,
    pub description: String,
    pub files: Vec<FileSpec>,
    pub max_blocks_per_record: usize,
    pub trailing_padding: usize,
    pub data_xor: bool,
}

impl DskimgBuilder {
    pub fn new() -> Self {
        Self {
            key: 0x96,
            exponent_base: 9,
            exponent_increment: 0,
            fat_start_block: 1,
            description: "TEST MAP".to_string(),
            files: Vec::new(),
            max_blocks_per_record: 240,
            trailing_padding: 0,
            data_xor: false,
        }
    }

    pub fn add_file(&mut self, name: &str, content: &[u8]) -> &mut Self {
        let (basename, extension) = name.split_once('.').unwrap_or((name, ""));
        self.files.push(FileSpec {
            basename: basename.to_string(),
            extension: extension.to_string(),
            content: content.to_vec(),
        });
        self
    }

    pub fn block_size(&self) -> usize {
        1 << (self.exponent_base as u32 + self.exponent_increment as u32)
    }

    /// Plaintext boot sector with the Garmin header
    pub fn header_sector(&self) -> [u8; 512] {
        let mut s = [0u8; 512];
        s[0x08..0x0A].copy_from_slice(&4u16.to_le_bytes()); // version
        s[0x0A] = 5; // June
        s[0x0B] = 0x17; // 2023
        s[0x10..0x17].copy_from_slice(b"DSKIMG\0");
        s[0x18..0x1A].copy_from_slice(&32u16.to_le_bytes()); // sectors
        s[0x1A..0x1C].copy_from_slice(&4u16.to_le_bytes()); // heads
        s[0x1C..0x1E].copy_from_slice(&0x100u16.to_le_bytes()); // cylinders
        s[0x39..0x3B].copy_from_slice(&2021u16.to_le_bytes());
        s[0x3B] = 11; // December
        s[0x3C] = 24;
        s[0x3D] = 13;
        s[0x3E] = 45;
        s[0x3F] = 30;
        s[0x40] = self.fat_start_block;
        s[0x41..0x48].copy_from_slice(b"GARMIN\0");

        let mut description = [b' '; 50];
        let bytes = self.description.as_bytes();
        description[..bytes.len()].copy_from_slice(bytes);
        s[0x49..0x5D].copy_from_slice(&description[..20]);
        s[0x65..0x83].copy_from_slice(&description[20..]);

        s[0x5D..0x5F].copy_from_slice(&4u16.to_le_bytes());
        s[0x5F..0x61].copy_from_slice(&32u16.to_le_bytes());
        s[0x61] = self.exponent_base;
        s[0x62] = self.exponent_increment;
        s[0x63..0x65].copy_from_slice(&0x0800u16.to_le_bytes());

        s[510] = 0x55;
        s[511] = 0xAA;
        s
    }

    /// Build an image from explicit FAT records (record 0 included)
    ///
    /// Header and FAT are obfuscated; everything else is left zero for the
    /// caller to fill with data blocks.
    pub fn build_raw(&self, records: &[[u8; 512]], image_len: usize) -> Vec<u8> {
        let fat_offset = self.fat_start_block as usize * 512;
        let fat_end = fat_offset + records.len() * 512;
        let mut image = vec![0u8; image_len.max(fat_end)];

        image[..512].copy_from_slice(&self.header_sector());
        for (i, record) in records.iter().enumerate() {
            let at = fat_offset + i * 512;
            image[at..at + 512].copy_from_slice(record);
        }
        for byte in &mut image[..fat_end] {
            *byte ^= self.key;
        }
        image
    }

    /// Build a complete image
    pub fn build(&self) -> Vec<u8> {
        let block_size = self.block_size();
        let fat_offset = self.fat_start_block as usize * 512;

        let per_file: Vec<usize> = self
            .files
            .iter()
            .map(|f| f.content.len().div_ceil(block_size))
            .collect();
        let file_records: usize = per_file
            .iter()
            .map(|&blocks| blocks.div_ceil(self.max_blocks_per_record).max(1))
            .sum();
        let record_count = 1 + file_records + self.trailing_padding;
        let fat_end = fat_offset + record_count * 512;
        let first_data_block = fat_end.div_ceil(block_size);
        let data_blocks_offset = first_data_block * block_size;

        let mut records = vec![fat_record(
            1,
            "",
            "",
            data_blocks_offset as u32,
            0,
            &[],
        )];

        let mut next_block = first_data_block;
        let mut placements = Vec::new();
        for (file, &blocks) in self.files.iter().zip(&per_file) {
            let numbers: Vec<u16> = (next_block..next_block + blocks).map(|b| b as u16).collect();
            placements.push((next_block, file));
            next_block += blocks;

            let chunks: Vec<&[u16]> = if numbers.is_empty() {
                vec![&[][..]]
            } else {
                numbers.chunks(self.max_blocks_per_record).collect()
            };
            for (part, chunk) in chunks.into_iter().enumerate() {
                records.push(fat_record(
                    1,
                    &file.basename,
                    &file.extension,
                    file.content.len() as u32,
                    part as u16,
                    chunk,
                ));
            }
        }
        for _ in 0..self.trailing_padding {
            records.push(fat_record(0, "", "", 0, 0, &[]));
        }
        // Fill any gap up to the first data block with padding records
        while fat_offset + records.len() * 512 < data_blocks_offset {
            records.push(fat_record(0, "", "", 0, 0, &[]));
        }

        let mut image = self.build_raw(&records, next_block * block_size);
        for (block, file) in placements {
            let at = block * block_size;
            let dst = &mut image[at..at + file.content.len()];
            dst.copy_from_slice(&file.content);
            if self.data_xor {
                for byte in dst.iter_mut() {
                    *byte ^= self.key;
                }
            }
        }
        image
    }
}

/// Plaintext 512-byte FAT record
pub fn fat_record(
    entry_type: u8,
    basename: &str,
    extension: &str,
    file_size: u32,
    part: u16,
    blocks: &[u16],
) -> [u8; 512] {
    let mut r = [0u8; 512];
    r[0] = entry_type;

    let mut name = [b' '; 11];
    name[..basename.len()].copy_from_slice(basename.as_bytes());
    name[8..8 + extension.len()].copy_from_slice(extension.as_bytes());
    r[1..12].copy_from_slice(&name);

    r[0x0C..0x10].copy_from_slice(&file_size.to_le_bytes());
    r[0x10..0x12].copy_from_slice(&part.to_le_bytes());

    for i in 0..240 {
        let value = blocks.get(i).copied().unwrap_or(0xFFFF);
        r[0x20 + i * 2..0x22 + i * 2].copy_from_slice(&value.to_le_bytes());
    }
    r
}
