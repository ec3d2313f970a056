//! Rencode type-code table.
//!
//! The bencode type codes are extended and relocated over the byte range
//! 0..=255. Every tag belongs to at most one region; the regions are checked
//! for overlap at compile time.

// Single-value tags.
pub const FLOAT_64: u8 = 44;
pub const LENGTH_DELIMITER: u8 = b':';
pub const LIST: u8 = 59;
pub const DICT: u8 = 60;
pub const BIG_NUMBER: u8 = 61;
pub const INT_1: u8 = 62;
pub const INT_2: u8 = 63;
pub const INT_4: u8 = 64;
pub const INT_8: u8 = 65;
pub const FLOAT_32: u8 = 66;
pub const TRUE: u8 = 67;
pub const FALSE: u8 = 68;
pub const NULL: u8 = 69;
pub const TERM: u8 = 127;

// Positive integers with the value embedded in the tag: 0..=43.
pub const INT_POS_FIXED_START: u8 = 0;
pub const INT_POS_FIXED_COUNT: u8 = 44;

// Negative integers with the value embedded in the tag: 70..=101 (-1..=-32).
pub const INT_NEG_FIXED_START: u8 = 70;
pub const INT_NEG_FIXED_COUNT: u8 = 32;

// Dictionaries with the pair count embedded in the tag: 102..=126.
pub const DICT_FIXED_START: u8 = 102;
pub const DICT_FIXED_COUNT: usize = 25;

// Strings with the byte length embedded in the tag: 128..=191.
pub const STR_FIXED_START: u8 = 128;
pub const STR_FIXED_COUNT: usize = 64;

// Lists with the item count embedded in the tag: 192..=255.
pub const LIST_FIXED_START: u8 = 192;
pub const LIST_FIXED_COUNT: usize = 64;

/// Maximum length (exclusive) of a big number's ASCII form.
pub const MAX_NUMBER_TEXT_LEN: usize = 64;

const INT_POS_FIXED_LAST: u8 = INT_POS_FIXED_START + INT_POS_FIXED_COUNT - 1;
const INT_NEG_FIXED_LAST: u8 = INT_NEG_FIXED_START + INT_NEG_FIXED_COUNT - 1;
const DICT_FIXED_LAST: u8 = DICT_FIXED_START + (DICT_FIXED_COUNT as u8) - 1;
const STR_FIXED_LAST: u8 = STR_FIXED_START + (STR_FIXED_COUNT as u8) - 1;

/// A half-open range of tags `[start, start + count)` with one meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub start: u16,
    pub count: u16,
}

impl Region {
    const fn new(name: &'static str, start: u8, count: usize) -> Self {
        Self {
            name,
            start: start as u16,
            count: count as u16,
        }
    }

    const fn single(name: &'static str, tag: u8) -> Self {
        Self::new(name, tag, 1)
    }

    const fn end(&self) -> u16 {
        self.start + self.count
    }

    pub const fn contains(&self, tag: u8) -> bool {
        let tag = tag as u16;
        self.start <= tag && tag < self.end()
    }
}

/// Every assigned region of the tag space.
pub const REGIONS: [Region; 19] = [
    Region::new("positive fixed integer", INT_POS_FIXED_START, INT_POS_FIXED_COUNT as usize),
    Region::single("float64", FLOAT_64),
    Region::new("length digits", b'0', 10),
    Region::single("list", LIST),
    Region::single("dict", DICT),
    Region::single("big number", BIG_NUMBER),
    Region::single("int1", INT_1),
    Region::single("int2", INT_2),
    Region::single("int4", INT_4),
    Region::single("int8", INT_8),
    Region::single("float32", FLOAT_32),
    Region::single("true", TRUE),
    Region::single("false", FALSE),
    Region::single("null", NULL),
    Region::new("negative fixed integer", INT_NEG_FIXED_START, INT_NEG_FIXED_COUNT as usize),
    Region::new("fixed dict", DICT_FIXED_START, DICT_FIXED_COUNT),
    Region::single("terminator", TERM),
    Region::new("fixed string", STR_FIXED_START, STR_FIXED_COUNT),
    Region::new("fixed list", LIST_FIXED_START, LIST_FIXED_COUNT),
];

const fn regions_disjoint(regions: &[Region]) -> bool {
    let mut i = 0;
    while i < regions.len() {
        if regions[i].count == 0 || regions[i].end() > 256 {
            return false;
        }
        let mut j = i + 1;
        while j < regions.len() {
            let (a, b) = (&regions[i], &regions[j]);
            if a.start < b.end() && b.start < a.end() {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const _: () = assert!(regions_disjoint(&REGIONS), "rencode tag regions overlap");

/// Returns the region a tag belongs to, if any.
pub fn region_of(tag: u8) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.contains(tag))
}

/// Decoded meaning of a tag byte, with any embedded value already extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCode {
    /// Small integer stored in the tag itself.
    FixedInt(i8),
    /// First ASCII digit of a `<len>:` string length.
    LengthDigit(u8),
    List,
    Dict,
    BigNumber,
    Int1,
    Int2,
    Int4,
    Int8,
    Float32,
    Float64,
    True,
    False,
    Null,
    Term,
    FixedDict(usize),
    FixedStr(usize),
    FixedList(usize),
}

/// Classifies a tag byte. Returns `None` for unassigned tags.
pub const fn classify(tag: u8) -> Option<TypeCode> {
    let code = match tag {
        INT_POS_FIXED_START..=INT_POS_FIXED_LAST => {
            TypeCode::FixedInt((tag - INT_POS_FIXED_START) as i8)
        }
        FLOAT_64 => TypeCode::Float64,
        b'0'..=b'9' => TypeCode::LengthDigit(tag - b'0'),
        LIST => TypeCode::List,
        DICT => TypeCode::Dict,
        BIG_NUMBER => TypeCode::BigNumber,
        INT_1 => TypeCode::Int1,
        INT_2 => TypeCode::Int2,
        INT_4 => TypeCode::Int4,
        INT_8 => TypeCode::Int8,
        FLOAT_32 => TypeCode::Float32,
        TRUE => TypeCode::True,
        FALSE => TypeCode::False,
        NULL => TypeCode::Null,
        INT_NEG_FIXED_START..=INT_NEG_FIXED_LAST => {
            TypeCode::FixedInt((INT_NEG_FIXED_START as i16 - 1 - tag as i16) as i8)
        }
        DICT_FIXED_START..=DICT_FIXED_LAST => {
            TypeCode::FixedDict((tag - DICT_FIXED_START) as usize)
        }
        TERM => TypeCode::Term,
        STR_FIXED_START..=STR_FIXED_LAST => TypeCode::FixedStr((tag - STR_FIXED_START) as usize),
        LIST_FIXED_START..=u8::MAX => TypeCode::FixedList((tag - LIST_FIXED_START) as usize),
        _ => return None,
    };
    Some(code)
}

/// Returns the tag that embeds `value`, if it lies in a fixed-integer range.
pub const fn fixed_int_tag(value: i64) -> Option<u8> {
    if 0 <= value && value < INT_POS_FIXED_COUNT as i64 {
        Some(INT_POS_FIXED_START + value as u8)
    } else if -(INT_NEG_FIXED_COUNT as i64) <= value && value < 0 {
        Some((INT_NEG_FIXED_START as i64 - 1 - value) as u8)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_agrees_with_regions() {
        for tag in 0..=u8::MAX {
            assert_eq!(
                classify(tag).is_some(),
                region_of(tag).is_some(),
                "tag {tag} disagrees"
            );
        }
    }

    #[test]
    fn unassigned_tags() {
        let unassigned: Vec<u8> = (0..=u8::MAX).filter(|&t| classify(t).is_none()).collect();
        assert_eq!(unassigned, vec![45, 46, 47, LENGTH_DELIMITER]);
    }

    #[test]
    fn fixed_integer_boundaries() {
        assert_eq!(classify(0), Some(TypeCode::FixedInt(0)));
        assert_eq!(classify(43), Some(TypeCode::FixedInt(43)));
        assert_eq!(classify(70), Some(TypeCode::FixedInt(-1)));
        assert_eq!(classify(101), Some(TypeCode::FixedInt(-32)));
        assert_eq!(classify(44), Some(TypeCode::Float64));
    }

    #[test]
    fn fixed_container_boundaries() {
        assert_eq!(classify(102), Some(TypeCode::FixedDict(0)));
        assert_eq!(classify(126), Some(TypeCode::FixedDict(24)));
        assert_eq!(classify(127), Some(TypeCode::Term));
        assert_eq!(classify(128), Some(TypeCode::FixedStr(0)));
        assert_eq!(classify(191), Some(TypeCode::FixedStr(63)));
        assert_eq!(classify(192), Some(TypeCode::FixedList(0)));
        assert_eq!(classify(255), Some(TypeCode::FixedList(63)));
    }

    #[test]
    fn fixed_int_tag_is_inverse_of_classify() {
        for value in -32..=43i64 {
            let tag = fixed_int_tag(value).expect("in fixed range");
            assert_eq!(classify(tag), Some(TypeCode::FixedInt(value as i8)));
        }
        assert_eq!(fixed_int_tag(44), None);
        assert_eq!(fixed_int_tag(-33), None);
    }

    #[test]
    fn region_lookup_names() {
        assert_eq!(region_of(b'7').map(|r| r.name), Some("length digits"));
        assert_eq!(region_of(200).map(|r| r.name), Some("fixed list"));
        assert_eq!(region_of(46), None);
    }
}
