//! NBT 标签树解析 (大端序，Java 版格式)
//!
//! 文件内容为一个带名字的 Compound 根标签，每个字段由
//! `类型 ID (u8) + 名字 (u16 长度 + 字节) + 数据` 组成。

use crate::error::{MapError, Result};
use byteorder::{BigEndian, ReadBytesExt};
use std::collections::HashMap;
use std::io::{self, Cursor, Read};

pub const TAG_END: u8 = 0;
pub const TAG_BYTE: u8 = 1;
pub const TAG_SHORT: u8 = 2;
pub const TAG_INT: u8 = 3;
pub const TAG_LONG: u8 = 4;
pub const TAG_FLOAT: u8 = 5;
pub const TAG_DOUBLE: u8 = 6;
pub const TAG_BYTE_ARRAY: u8 = 7;
pub const TAG_STRING: u8 = 8;
pub const TAG_LIST: u8 = 9;
pub const TAG_COMPOUND: u8 = 10;
pub const TAG_INT_ARRAY: u8 = 11;
pub const TAG_LONG_ARRAY: u8 = 12;

/// 最大嵌套深度
pub const MAX_DEPTH: usize = 512;

/// 标签树节点
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    String(String),
    List(Vec<Tag>),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    /// 类型 ID
    #[cfg(test)]
    pub fn id(&self) -> u8 {
        match self {
            Tag::Byte(_) => TAG_BYTE,
            Tag::Short(_) => TAG_SHORT,
            Tag::Int(_) => TAG_INT,
            Tag::Long(_) => TAG_LONG,
            Tag::Float(_) => TAG_FLOAT,
            Tag::Double(_) => TAG_DOUBLE,
            Tag::ByteArray(_) => TAG_BYTE_ARRAY,
            Tag::String(_) => TAG_STRING,
            Tag::List(_) => TAG_LIST,
            Tag::Compound(_) => TAG_COMPOUND,
            Tag::IntArray(_) => TAG_INT_ARRAY,
            Tag::LongArray(_) => TAG_LONG_ARRAY,
        }
    }

    /// 类型名称
    pub fn kind(&self) -> &'static str {
        match self {
            Tag::Byte(_) => "Byte",
            Tag::Short(_) => "Short",
            Tag::Int(_) => "Int",
            Tag::Long(_) => "Long",
            Tag::Float(_) => "Float",
            Tag::Double(_) => "Double",
            Tag::ByteArray(_) => "ByteArray",
            Tag::String(_) => "String",
            Tag::List(_) => "List",
            Tag::Compound(_) => "Compound",
            Tag::IntArray(_) => "IntArray",
            Tag::LongArray(_) => "LongArray",
        }
    }

    fn unexpected(&self, expected: &str) -> MapError {
        MapError::Shape(format!("期望 {expected}，实际为 {}", self.kind()))
    }

    pub fn as_compound(&self) -> Result<&Compound> {
        match self {
            Tag::Compound(c) => Ok(c),
            other => Err(other.unexpected("Compound")),
        }
    }

    pub fn as_byte_array(&self) -> Result<&[u8]> {
        match self {
            Tag::ByteArray(bytes) => Ok(bytes),
            other => Err(other.unexpected("ByteArray")),
        }
    }

    pub fn as_byte(&self) -> Result<i8> {
        match self {
            Tag::Byte(v) => Ok(*v),
            other => Err(other.unexpected("Byte")),
        }
    }

    pub fn as_int(&self) -> Result<i32> {
        match self {
            Tag::Int(v) => Ok(*v),
            other => Err(other.unexpected("Int")),
        }
    }
}

/// 具名字段集合
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    entries: HashMap<String, Tag>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, tag: Tag) {
        self.entries.insert(key.into(), tag);
    }

    /// 获取字段，不存在时返回结构错误
    pub fn get(&self, key: &str) -> Result<&Tag> {
        self.entries
            .get(key)
            .ok_or_else(|| MapError::Shape(format!("缺少字段 \"{key}\"")))
    }

    /// 获取可选字段
    pub fn find(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }
}

/// 解析后的完整文档
#[derive(Debug, Clone, PartialEq)]
pub struct NbtDocument {
    /// 根标签名 (地图文件中通常为空字符串)
    pub name: String,
    pub root: Compound,
}

/// 解析未压缩的 NBT 数据
pub fn parse(data: &[u8]) -> Result<NbtDocument> {
    let mut reader = NbtReader::new(data);

    let id = reader.read_u8()?;
    if id != TAG_COMPOUND {
        return Err(MapError::Nbt(format!("根标签必须是 Compound，实际类型 ID 为 {id}")));
    }
    let name = reader.read_string()?;
    let root = reader.read_compound()?;

    if reader.remaining() > 0 {
        tracing::trace!("NBT 数据末尾有 {} 个未使用字节", reader.remaining());
    }

    Ok(NbtDocument { name, root })
}

fn truncated(e: io::Error) -> MapError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        MapError::Nbt("数据被截断".to_string())
    } else {
        MapError::Nbt(e.to_string())
    }
}

/// 各类型数据的最小字节数，用于在分配前校验长度
fn min_payload_size(id: u8) -> Result<usize> {
    Ok(match id {
        TAG_END => 0,
        TAG_BYTE | TAG_COMPOUND => 1,
        TAG_SHORT | TAG_STRING => 2,
        TAG_INT | TAG_FLOAT | TAG_BYTE_ARRAY | TAG_INT_ARRAY | TAG_LONG_ARRAY => 4,
        TAG_LONG | TAG_DOUBLE => 8,
        TAG_LIST => 5,
        other => return Err(MapError::Nbt(format!("未知的标签类型: {other}"))),
    })
}

struct NbtReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> NbtReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len();
        len.saturating_sub(self.cursor.position() as usize)
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.cursor.read_u8().map_err(truncated)
    }

    /// 读取 i32 长度并确认剩余数据足够
    fn read_len(&mut self, elem_size: usize, what: &str) -> Result<usize> {
        let len = self.cursor.read_i32::<BigEndian>().map_err(truncated)?;
        if len < 0 {
            return Err(MapError::Nbt(format!("{what} 长度为负数: {len}")));
        }
        let len = len as usize;
        if len.saturating_mul(elem_size) > self.remaining() {
            return Err(MapError::Nbt(format!("{what} 长度 {len} 超出剩余数据")));
        }
        Ok(len)
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.cursor.read_exact(&mut buf).map_err(truncated)?;
        Ok(buf)
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.cursor.read_u16::<BigEndian>().map_err(truncated)? as usize;
        let bytes = self.read_bytes(len)?;
        // 非标准 UTF-8 (如 Java 的 modified UTF-8) 做宽松转换
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// 读取 List 头部 (元素类型 + 长度)
    fn read_list_header(&mut self) -> Result<(u8, usize)> {
        let elem_id = self.read_u8()?;
        let len = self.read_len(min_payload_size(elem_id)?, "List")?;
        if elem_id == TAG_END && len > 0 {
            return Err(MapError::Nbt("非空 List 的元素类型不能为 End".to_string()));
        }
        Ok((elem_id, len))
    }

    /// 读取 Compound 的全部字段
    ///
    /// 嵌套的 List/Compound 用显式栈展开，不使用递归，
    /// 嵌套深度只受 `MAX_DEPTH` 限制，与线程栈大小无关。
    fn read_compound(&mut self) -> Result<Compound> {
        let mut stack = vec![Frame::Compound {
            compound: Compound::new(),
            pending: String::new(),
        }];

        loop {
            let Some(top) = stack.last_mut() else {
                return Err(MapError::Nbt("解析栈为空".to_string()));
            };

            let id = match top {
                Frame::Compound { compound, pending } => {
                    let id = self.read_u8()?;
                    if id == TAG_END {
                        let compound = std::mem::take(compound);
                        stack.pop();
                        if stack.is_empty() {
                            return Ok(compound);
                        }
                        deliver(&mut stack, Tag::Compound(compound));
                        continue;
                    }
                    *pending = self.read_string()?;
                    id
                }
                Frame::List { elem_id, remaining, items } => {
                    if *remaining == 0 {
                        let items = std::mem::take(items);
                        stack.pop();
                        deliver(&mut stack, Tag::List(items));
                        continue;
                    }
                    *remaining -= 1;
                    *elem_id
                }
            };

            match id {
                TAG_LIST => {
                    if stack.len() >= MAX_DEPTH {
                        return Err(MapError::Nbt(format!("嵌套深度超过 {MAX_DEPTH}")));
                    }
                    let (elem_id, len) = self.read_list_header()?;
                    stack.push(Frame::List {
                        elem_id,
                        remaining: len,
                        items: Vec::with_capacity(len),
                    });
                }
                TAG_COMPOUND => {
                    if stack.len() >= MAX_DEPTH {
                        return Err(MapError::Nbt(format!("嵌套深度超过 {MAX_DEPTH}")));
                    }
                    stack.push(Frame::Compound {
                        compound: Compound::new(),
                        pending: String::new(),
                    });
                }
                id => {
                    let tag = self.read_scalar(id)?;
                    deliver(&mut stack, tag);
                }
            }
        }
    }

    /// 读取非容器类型的数据
    fn read_scalar(&mut self, id: u8) -> Result<Tag> {
        let tag = match id {
            TAG_BYTE => Tag::Byte(self.cursor.read_i8().map_err(truncated)?),
            TAG_SHORT => Tag::Short(self.cursor.read_i16::<BigEndian>().map_err(truncated)?),
            TAG_INT => Tag::Int(self.cursor.read_i32::<BigEndian>().map_err(truncated)?),
            TAG_LONG => Tag::Long(self.cursor.read_i64::<BigEndian>().map_err(truncated)?),
            TAG_FLOAT => Tag::Float(self.cursor.read_f32::<BigEndian>().map_err(truncated)?),
            TAG_DOUBLE => Tag::Double(self.cursor.read_f64::<BigEndian>().map_err(truncated)?),
            TAG_BYTE_ARRAY => {
                let len = self.read_len(1, "ByteArray")?;
                Tag::ByteArray(self.read_bytes(len)?)
            }
            TAG_STRING => Tag::String(self.read_string()?),
            TAG_INT_ARRAY => {
                let len = self.read_len(4, "IntArray")?;
                let mut values = vec![0i32; len];
                self.cursor
                    .read_i32_into::<BigEndian>(&mut values)
                    .map_err(truncated)?;
                Tag::IntArray(values)
            }
            TAG_LONG_ARRAY => {
                let len = self.read_len(8, "LongArray")?;
                let mut values = vec![0i64; len];
                self.cursor
                    .read_i64_into::<BigEndian>(&mut values)
                    .map_err(truncated)?;
                Tag::LongArray(values)
            }
            other => return Err(MapError::Nbt(format!("未知的标签类型: {other}"))),
        };
        Ok(tag)
    }
}

/// 解析过程中尚未读完的容器
enum Frame {
    Compound {
        compound: Compound,
        /// 正在读取的字段名
        pending: String,
    },
    List {
        elem_id: u8,
        remaining: usize,
        items: Vec<Tag>,
    },
}

/// 把读完的值放入上一层容器
fn deliver(stack: &mut [Frame], tag: Tag) {
    match stack.last_mut() {
        Some(Frame::Compound { compound, pending }) => {
            compound.insert(std::mem::take(pending), tag);
        }
        Some(Frame::List { items, .. }) => items.push(tag),
        None => {}
    }
}
