//! 压缩/解压缩功能

use crate::error::{MapError, Result};
use flate2::read::MultiGzDecoder;
use std::io::Read;

/// GZIP 文件头魔数
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// 使用 GZIP 压缩数据
#[cfg(test)]
pub fn compress_gzip(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// 使用 GZIP 解压数据
///
/// 多个 GZIP 成员首尾相接时依次解压并拼接。
pub fn decompress_gzip(data: &[u8]) -> Result<Vec<u8>> {
    if !data.starts_with(&GZIP_MAGIC) {
        return Err(MapError::Decompress("缺少 GZIP 文件头".to_string()));
    }

    let mut decoder = MultiGzDecoder::new(data);
    let mut output = Vec::new();
    decoder
        .read_to_end(&mut output)
        .map_err(|e| MapError::Decompress(e.to_string()))?;
    Ok(output)
}
