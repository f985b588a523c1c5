//! Textual sub-selector restricted to boolean string predicates.

use arrow::{
    array::{AsArray, BooleanArray, StringArray},
    compute::{
        cast,
        kernels::{comparison, regexp::regexp_is_match_scalar},
    },
    datatypes::DataType,
};

use crate::{
    error::{Result, SelectError},
    frame::{MaskFilter, Series},
    logging::TEXT_LOG_CTX,
    select::{guard::OperationGuard, mask},
};

/// Textual operations that return one boolean per row.
pub const TEXT_BOOLEAN_OPS: &[&str] = &[
    "contains",
    "endswith",
    "isalnum",
    "isalpha",
    "isdecimal",
    "isdigit",
    "islower",
    "isnumeric",
    "isspace",
    "istitle",
    "isupper",
    "match",
    "startswith",
];

// Routines of the textual operation set that transform or reshape text.
const TEXT_ROUTINES: &[&str] = &[
    "capitalize",
    "casefold",
    "cat",
    "center",
    "count",
    "decode",
    "encode",
    "extract",
    "extractall",
    "find",
    "findall",
    "fullmatch",
    "get",
    "get_dummies",
    "index",
    "join",
    "len",
    "ljust",
    "lower",
    "lstrip",
    "normalize",
    "pad",
    "partition",
    "removeprefix",
    "removesuffix",
    "repeat",
    "replace",
    "rfind",
    "rindex",
    "rjust",
    "rpartition",
    "rsplit",
    "rstrip",
    "slice",
    "slice_replace",
    "split",
    "strip",
    "swapcase",
    "title",
    "translate",
    "upper",
    "wrap",
    "zfill",
];

/// Guard shared by every textual sub-selector.
pub const TEXT_GUARD: OperationGuard =
    OperationGuard::new("str", TEXT_BOOLEAN_OPS, TEXT_ROUTINES, TEXT_LOG_CTX);

/// How `contains` and `match` interpret their pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternOptions {
    case_sensitive: bool,
    regex: bool,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            regex: true,
        }
    }
}

impl PatternOptions {
    /// Whether letter case must match.
    #[must_use]
    pub fn case_sensitive(self, case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            ..self
        }
    }

    /// Whether the pattern is a regular expression or a literal.
    #[must_use]
    pub fn regex(self, regex: bool) -> Self {
        Self { regex, ..self }
    }

    // Regular expression handed to the regexp kernel; `None` when a plain
    // substring or prefix kernel is enough.
    fn regex_source(&self, pattern: &str, anchored: bool) -> Option<String> {
        if !self.regex && self.case_sensitive {
            return None;
        }
        let body = if self.regex {
            pattern.to_owned()
        } else {
            regex::escape(pattern)
        };
        Some(if anchored {
            format!("^(?:{body})")
        } else {
            body
        })
    }

    fn flag(&self) -> Option<&'static str> {
        (!self.case_sensitive).then_some("i")
    }
}

/// Character-class predicates; each is false for the empty string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Letters and digits only.
    Alnum,
    /// Letters only.
    Alpha,
    /// Decimal digits of any script.
    Decimal,
    /// Digits, including superscripts.
    Digit,
    /// At least one cased character, all of them lowercase.
    Lower,
    /// Numeric characters of any script.
    Numeric,
    /// Whitespace only.
    Space,
    /// Titlecased words.
    Title,
    /// At least one cased character, all of them uppercase.
    Upper,
}

impl CharClass {
    /// All character classes.
    pub const ALL: [CharClass; 9] = [
        CharClass::Alnum,
        CharClass::Alpha,
        CharClass::Decimal,
        CharClass::Digit,
        CharClass::Lower,
        CharClass::Numeric,
        CharClass::Space,
        CharClass::Title,
        CharClass::Upper,
    ];

    /// Operation name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CharClass::Alnum => "isalnum",
            CharClass::Alpha => "isalpha",
            CharClass::Decimal => "isdecimal",
            CharClass::Digit => "isdigit",
            CharClass::Lower => "islower",
            CharClass::Numeric => "isnumeric",
            CharClass::Space => "isspace",
            CharClass::Title => "istitle",
            CharClass::Upper => "isupper",
        }
    }

    /// Looks a class up by operation name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.name() == name)
    }

    /// Evaluates the class over every value. Empty strings never match and
    /// NULL values yield NULL mask slots.
    pub fn evaluate(self, text: &StringArray) -> Result<BooleanArray> {
        let test: fn(&str) -> bool = match self {
            CharClass::Decimal => return Ok(regexp_is_match_scalar(text, DECIMAL_PATTERN, None)?),
            CharClass::Digit => return Ok(regexp_is_match_scalar(text, DIGIT_PATTERN, None)?),
            CharClass::Alnum => |value| value.chars().all(char::is_alphanumeric),
            CharClass::Alpha => |value| value.chars().all(char::is_alphabetic),
            CharClass::Numeric => |value| value.chars().all(char::is_numeric),
            CharClass::Space => |value| value.chars().all(char::is_whitespace),
            CharClass::Lower => |value| all_cased(value, char::is_lowercase, char::is_uppercase),
            CharClass::Upper => |value| all_cased(value, char::is_uppercase, char::is_lowercase),
            CharClass::Title => is_title,
        };
        Ok(text
            .iter()
            .map(|value| value.map(|value| !value.is_empty() && test(value)))
            .collect())
    }
}

// General category Nd, any script.
const DECIMAL_PATTERN: &str = r"^\p{Nd}+$";

// Nd plus the superscript, subscript and circled characters that carry a digit value.
const DIGIT_PATTERN: &str =
    r"^[\p{Nd}\x{B2}\x{B3}\x{B9}\x{2070}\x{2074}-\x{2079}\x{2080}-\x{2089}\x{2460}-\x{2468}]+$";

// At least one cased character, none of them of the opposite case.
fn all_cased(text: &str, cased: fn(char) -> bool, opposite: fn(char) -> bool) -> bool {
    let mut seen = false;
    for c in text.chars() {
        if opposite(c) {
            return false;
        }
        seen |= cased(c);
    }
    seen
}

// Uppercase letters may only follow uncased characters, lowercase only cased ones.
fn is_title(text: &str) -> bool {
    let mut cased = false;
    let mut previous_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }
    cased
}

/// A boolean textual operation with its arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum TextPredicate {
    /// Pattern or substring found anywhere in the value.
    Contains {
        /// Pattern or literal.
        pattern: String,
        /// Interpretation of `pattern`.
        options: PatternOptions,
    },
    /// Value starts with the prefix.
    StartsWith(String),
    /// Value ends with the suffix.
    EndsWith(String),
    /// Pattern matches at the start of the value.
    Match {
        /// Pattern or literal.
        pattern: String,
        /// Interpretation of `pattern`.
        options: PatternOptions,
    },
    /// Every character belongs to the class.
    Class(CharClass),
}

impl TextPredicate {
    /// Operation name as listed in [`TEXT_BOOLEAN_OPS`].
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TextPredicate::Contains { .. } => "contains",
            TextPredicate::StartsWith(_) => "startswith",
            TextPredicate::EndsWith(_) => "endswith",
            TextPredicate::Match { .. } => "match",
            TextPredicate::Class(class) => class.name(),
        }
    }

    /// Builds a predicate from an operation name and its string arguments.
    pub fn from_call(name: &str, args: &[&str]) -> Result<Self> {
        if let Some(class) = CharClass::from_name(name) {
            expect_arity(name, args, 0, "0")?;
            return Ok(TextPredicate::Class(class));
        }
        let predicate = match name {
            "contains" => TextPredicate::Contains {
                pattern: single_arg(name, args)?,
                options: PatternOptions::default(),
            },
            "match" => TextPredicate::Match {
                pattern: single_arg(name, args)?,
                options: PatternOptions::default(),
            },
            "startswith" => TextPredicate::StartsWith(single_arg(name, args)?),
            "endswith" => TextPredicate::EndsWith(single_arg(name, args)?),
            _ => return Err(SelectError::AttributeNotFound(name.to_owned())),
        };
        Ok(predicate)
    }

    /// Evaluates the predicate; NULL values yield NULL mask slots.
    pub fn evaluate(&self, text: &StringArray) -> Result<BooleanArray> {
        let mask = match self {
            TextPredicate::Contains { pattern, options } => {
                match options.regex_source(pattern, false) {
                    Some(source) => regexp_is_match_scalar(text, &source, options.flag())?,
                    None => comparison::contains(text, &StringArray::new_scalar(pattern))?,
                }
            }
            TextPredicate::Match { pattern, options } => {
                match options.regex_source(pattern, true) {
                    Some(source) => regexp_is_match_scalar(text, &source, options.flag())?,
                    None => comparison::starts_with(text, &StringArray::new_scalar(pattern))?,
                }
            }
            TextPredicate::StartsWith(prefix) => {
                comparison::starts_with(text, &StringArray::new_scalar(prefix))?
            }
            TextPredicate::EndsWith(suffix) => {
                comparison::ends_with(text, &StringArray::new_scalar(suffix))?
            }
            TextPredicate::Class(class) => class.evaluate(text)?,
        };
        Ok(mask)
    }
}

fn expect_arity(name: &str, args: &[&str], want: usize, expected: &'static str) -> Result<()> {
    if args.len() == want {
        Ok(())
    } else {
        Err(SelectError::InvalidArity {
            op: name.to_owned(),
            expected,
            got: args.len(),
        })
    }
}

fn single_arg(name: &str, args: &[&str]) -> Result<String> {
    expect_arity(name, args, 1, "1")?;
    Ok(args[0].to_owned())
}

/// Textual projection of a column, bound to the owner its masks filter.
///
/// Operations always run against the column's values and always filter the
/// owner, which may be a whole frame or the bare series.
#[derive(Debug)]
pub struct TextSelector<'a, O> {
    owner: &'a O,
    column: String,
    text: StringArray,
}

impl<'a, O: MaskFilter> TextSelector<'a, O> {
    pub(crate) fn new(owner: &'a O, series: &Series) -> Result<Self> {
        let text = match series.data_type() {
            DataType::Utf8 => series.values().as_string::<i32>().clone(),
            data_type if is_string_like(data_type) => {
                cast(series.values().as_ref(), &DataType::Utf8)?
                    .as_string::<i32>()
                    .clone()
            }
            other => {
                return Err(SelectError::TypeMismatch {
                    accessor: "str",
                    column: series.name().to_owned(),
                    expected: "string",
                    actual: other.clone(),
                })
            }
        };
        Ok(Self {
            owner,
            column: series.name().to_owned(),
            text,
        })
    }

    /// The owner results are expressed in.
    #[must_use]
    pub fn owner(&self) -> &'a O {
        self.owner
    }

    /// Name of the bound column.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The column's values as UTF-8.
    #[must_use]
    pub fn values(&self) -> &StringArray {
        &self.text
    }

    /// Invokes a textual operation by name, subject to the allow-list.
    pub fn call(&self, name: &str, args: &[&str]) -> Result<O> {
        TEXT_GUARD.admit(name)?;
        self.apply(&TextPredicate::from_call(name, args)?)
    }

    /// Filters the owner by `predicate`.
    pub fn apply(&self, predicate: &TextPredicate) -> Result<O> {
        TEXT_GUARD.admit(predicate.name())?;
        let mask = predicate.evaluate(&self.text)?;
        mask::apply(self.owner, predicate.name(), &mask)
    }

    /// Rows whose value matches the regular expression `pattern` anywhere.
    pub fn contains(&self, pattern: &str) -> Result<O> {
        self.contains_with(pattern, PatternOptions::default())
    }

    /// [`TextSelector::contains`] with explicit pattern options.
    pub fn contains_with(&self, pattern: &str, options: PatternOptions) -> Result<O> {
        self.apply(&TextPredicate::Contains {
            pattern: pattern.to_owned(),
            options,
        })
    }

    /// Rows whose value matches the regular expression `pattern` at its start.
    pub fn matches(&self, pattern: &str) -> Result<O> {
        self.matches_with(pattern, PatternOptions::default())
    }

    /// [`TextSelector::matches`] with explicit pattern options.
    pub fn matches_with(&self, pattern: &str, options: PatternOptions) -> Result<O> {
        self.apply(&TextPredicate::Match {
            pattern: pattern.to_owned(),
            options,
        })
    }

    /// Rows whose value starts with `prefix`.
    pub fn startswith(&self, prefix: &str) -> Result<O> {
        self.apply(&TextPredicate::StartsWith(prefix.to_owned()))
    }

    /// Rows whose value ends with `suffix`.
    pub fn endswith(&self, suffix: &str) -> Result<O> {
        self.apply(&TextPredicate::EndsWith(suffix.to_owned()))
    }

    /// Rows whose value is non-empty and alphanumeric.
    pub fn isalnum(&self) -> Result<O> {
        self.apply(&TextPredicate::Class(CharClass::Alnum))
    }

    /// Rows whose value is non-empty and alphabetic.
    pub fn isalpha(&self) -> Result<O> {
        self.apply(&TextPredicate::Class(CharClass::Alpha))
    }

    /// Rows whose value is non-empty and made of decimal digits.
    pub fn isdecimal(&self) -> Result<O> {
        self.apply(&TextPredicate::Class(CharClass::Decimal))
    }

    /// Rows whose value is non-empty and made of digits.
    pub fn isdigit(&self) -> Result<O> {
        self.apply(&TextPredicate::Class(CharClass::Digit))
    }

    /// Rows whose cased characters are all lowercase.
    pub fn islower(&self) -> Result<O> {
        self.apply(&TextPredicate::Class(CharClass::Lower))
    }

    /// Rows whose value is non-empty and numeric.
    pub fn isnumeric(&self) -> Result<O> {
        self.apply(&TextPredicate::Class(CharClass::Numeric))
    }

    /// Rows whose value is non-empty whitespace.
    pub fn isspace(&self) -> Result<O> {
        self.apply(&TextPredicate::Class(CharClass::Space))
    }

    /// Rows whose value is titlecased.
    pub fn istitle(&self) -> Result<O> {
        self.apply(&TextPredicate::Class(CharClass::Title))
    }

    /// Rows whose cased characters are all uppercase.
    pub fn isupper(&self) -> Result<O> {
        self.apply(&TextPredicate::Class(CharClass::Upper))
    }
}

fn is_string_like(data_type: &DataType) -> bool {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => true,
        DataType::Dictionary(_, value) => is_string_like(value),
        _ => false,
    }
}
