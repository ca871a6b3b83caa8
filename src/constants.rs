// --- Constants for the Parquet file layout ---

pub const PARQUET_MAGIC: &[u8] = b"PAR1"; // opening and closing magic
pub const FOOTER_TAIL_LEN: usize = 8; // 4 bytes <footer_len: u32 LE> + 4 bytes magic
pub const LEVEL_LEN_PREFIX: usize = 4; // 4 bytes - <level block length: u32 LE>
