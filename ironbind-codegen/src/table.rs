//! Per-target type spelling tables.
//!
//! A table holds the spelling of every primitive and a template for every
//! type constructor. Templates use `$0`, `$1` for mapped argument types and
//! `$n` for the length of a fixed-length array.

use ironbind_schema::PrimitiveKind;

/// Type spellings of one target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeTable {
    /// Primitive spellings, indexed by [`PrimitiveKind::index`].
    pub primitives: [&'static str; PrimitiveKind::COUNT],
    /// `list<T>` template.
    pub list: &'static str,
    /// `set<T>` template.
    pub set: &'static str,
    /// `map<K, V>` template.
    pub map: &'static str,
    /// `T[]` template.
    pub var_array: &'static str,
    /// `T[n]` template.
    pub fixed_array: &'static str,
    /// Whether `T[n]` encodes the length in the target type.
    pub fixed_array_checked: bool,
    /// Optional dereferenceable handle to an instance of `$0`.
    pub optional_handle: &'static str,
    /// Opaque identity handle, used when references are not followed.
    pub raw_handle: &'static str,
    /// Type standing for an instance of any declaration.
    pub any_object: &'static str,
    /// Whether compound arguments of a space-separated type application
    /// need parentheses.
    pub parenthesize_arguments: bool,
}

/// Rust spellings.
pub const RUST_TABLE: TypeTable = TypeTable {
    primitives: ["bool", "String", "i8", "i16", "i32", "i64", "i64", "f32", "f64"],
    list: "Vec<$0>",
    set: "HashSet<$0>",
    map: "HashMap<$0, $1>",
    var_array: "Vec<$0>",
    fixed_array: "[$0; $n]",
    fixed_array_checked: true,
    optional_handle: "Option<Ptr<$0>>",
    raw_handle: "ObjectId",
    any_object: "dyn Object",
    parenthesize_arguments: false,
};

/// Haskell spellings.
///
/// Sets and both array forms are plain lists; the length of `T[n]` is
/// checked by generated setters in safe mode.
pub const HASKELL_TABLE: TypeTable = TypeTable {
    primitives: [
        "Bool", "String", "Int8", "Int16", "Int32", "Int64", "Int64", "Float", "Double",
    ],
    list: "[$0]",
    set: "[$0]",
    map: "M.Map $0 $1",
    var_array: "[$0]",
    fixed_array: "[$0]",
    fixed_array_checked: false,
    optional_handle: "Maybe $0",
    raw_handle: "Ref",
    any_object: "Pointer",
    parenthesize_arguments: true,
};

/// C++ spellings.
pub const CPP_TABLE: TypeTable = TypeTable {
    primitives: [
        "bool",
        "std::string",
        "int8_t",
        "int16_t",
        "int32_t",
        "int64_t",
        "int64_t",
        "float",
        "double",
    ],
    list: "std::vector<$0>",
    set: "std::set<$0>",
    map: "std::map<$0, $1>",
    var_array: "std::vector<$0>",
    fixed_array: "std::array<$0, $n>",
    fixed_array_checked: true,
    optional_handle: "std::optional<Ref<$0>>",
    raw_handle: "ObjectId",
    any_object: "Object",
    parenthesize_arguments: false,
};

impl TypeTable {
    /// Returns the spelling of a primitive.
    #[must_use]
    pub const fn primitive(&self, kind: PrimitiveKind) -> &'static str {
        self.primitives[kind.index()]
    }

    /// Fills a template with argument spellings and an optional length.
    ///
    /// A placeholder without a matching argument is left as written.
    #[must_use]
    pub fn apply(&self, template: &str, args: &[&str], length: Option<usize>) -> String {
        let capacity = template.len() + args.iter().map(|arg| arg.len()).sum::<usize>();
        let mut output = String::with_capacity(capacity);
        let mut chars = template.chars().peekable();
        let mut previous = None;

        while let Some(c) = chars.next() {
            if c != '$' {
                output.push(c);
                previous = Some(c);
                continue;
            }
            match (chars.peek().copied(), length) {
                (Some('n'), Some(length)) => {
                    chars.next();
                    output.push_str(&length.to_string());
                }
                (Some(digit), _) if digit.is_ascii_digit() => {
                    chars.next();
                    let index = digit as usize - '0' as usize;
                    match args.get(index) {
                        Some(arg) if self.needs_parentheses(previous, arg) => {
                            output.push('(');
                            output.push_str(arg);
                            output.push(')');
                        }
                        Some(arg) => output.push_str(arg),
                        None => {
                            output.push('$');
                            output.push(digit);
                        }
                    }
                }
                _ => output.push('$'),
            }
            previous = output.chars().last();
        }

        output
    }

    fn needs_parentheses(&self, previous: Option<char>, arg: &str) -> bool {
        self.parenthesize_arguments && previous == Some(' ') && is_compound(arg)
    }
}

/// Returns true if a spelling contains a space outside any brackets.
fn is_compound(spelling: &str) -> bool {
    let mut depth = 0usize;
    for c in spelling.chars() {
        match c {
            '(' | '[' | '<' => depth += 1,
            ')' | ']' | '>' => depth = depth.saturating_sub(1),
            ' ' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}
