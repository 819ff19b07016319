//! Textual type spellings.
//!
//! Field types reach the core as text such as `map<string, list<Person>>`
//! or `i8[4]`. A spelling is parsed into an unresolved [`TypeSpelling`] and
//! then resolved against the schema's declaration names. Both steps fail
//! closed: an unknown name is an error, never an implicit reference.
//!
//! Grammar:
//!
//! ```text
//! type   := base suffix*
//! base   := ident ( '<' type ( ',' type )* '>' )?
//! suffix := '[' ']' | '[' digits ']'
//! ```

use crate::error::TypeMappingError;
use crate::types::{Container, DeclId, PrimitiveKind, Type};
use std::fmt;

/// Spelling of the untyped reference.
pub const ANNOTATION: &str = "annotation";

/// Names of the generic containers.
pub const CONTAINER_NAMES: [&str; 3] = ["list", "set", "map"];

/// Parsed but unresolved type spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpelling {
    /// A primitive, `annotation` or declaration name.
    Named(String),
    /// `list<T>`
    List(Box<TypeSpelling>),
    /// `set<T>`
    Set(Box<TypeSpelling>),
    /// `map<K, V, ..>`; more than two arguments nest to the right.
    Map(Vec<TypeSpelling>),
    /// `T[]`
    VarArray(Box<TypeSpelling>),
    /// `T[n]`
    FixedArray(Box<TypeSpelling>, usize),
}

impl TypeSpelling {
    /// Parses a type spelling.
    ///
    /// # Errors
    /// Returns `TypeMappingError::Malformed` naming the full text if the
    /// spelling does not follow the type grammar.
    pub fn parse(text: &str) -> Result<Self, TypeMappingError> {
        let mut parser = SpellingParser {
            text,
            chars: text.char_indices().peekable(),
        };
        let spelling = parser.parse_type()?;
        parser.skip_whitespace();
        if let Some((pos, c)) = parser.chars.next() {
            return Err(parser.malformed(format!("unexpected '{c}' at offset {pos}")));
        }
        Ok(spelling)
    }

    /// Resolves names against the schema.
    ///
    /// `lookup` maps a declaration name to its id. Primitive names and
    /// `annotation` are matched case-insensitively before any lookup, so a
    /// field spelled `string` is always the value primitive.
    ///
    /// # Errors
    /// Returns `TypeMappingError::UnknownType` for a name that is neither a
    /// primitive, `annotation` nor a declaration, and
    /// `TypeMappingError::Malformed` for a map with fewer than two arguments.
    pub fn resolve<F>(&self, lookup: &F) -> Result<Type, TypeMappingError>
    where
        F: Fn(&str) -> Option<DeclId>,
    {
        match self {
            Self::Named(name) => {
                if let Some(kind) = PrimitiveKind::from_name(name) {
                    Ok(Type::Primitive(kind))
                } else if name.eq_ignore_ascii_case(ANNOTATION) {
                    Ok(Type::Annotation)
                } else {
                    lookup(name)
                        .map(Type::Reference)
                        .ok_or_else(|| TypeMappingError::UnknownType {
                            spelling: name.clone(),
                        })
                }
            }
            Self::List(elem) => Ok(Type::list(elem.resolve(lookup)?)),
            Self::Set(elem) => Ok(Type::set(elem.resolve(lookup)?)),
            Self::VarArray(elem) => Ok(Type::var_array(elem.resolve(lookup)?)),
            Self::FixedArray(elem, length) => Ok(Type::fixed_array(elem.resolve(lookup)?, *length)),
            Self::Map(args) => {
                let (last, rest) = match args.split_last() {
                    Some((last, rest)) if !rest.is_empty() => (last, rest),
                    _ => {
                        return Err(TypeMappingError::Malformed {
                            spelling: self.to_string(),
                            reason: "map requires at least two type arguments".to_string(),
                        });
                    }
                };
                let mut resolved = last.resolve(lookup)?;
                for key in rest.iter().rev() {
                    resolved = Type::map(key.resolve(lookup)?, resolved);
                }
                Ok(resolved)
            }
        }
    }

    /// Builds the canonical spelling of a resolved type.
    ///
    /// `name_of` maps a declaration id to its name; `None` spells the id
    /// as `#<index>`.
    #[must_use]
    pub fn of_type<F>(ty: &Type, name_of: &F) -> Self
    where
        F: Fn(DeclId) -> Option<String>,
    {
        match ty {
            Type::Primitive(kind) => Self::Named(kind.name().to_string()),
            Type::Annotation => Self::Named(ANNOTATION.to_string()),
            Type::Reference(id) => {
                Self::Named(name_of(*id).unwrap_or_else(|| format!("#{}", id.index())))
            }
            Type::Container(container) => match container {
                Container::List(elem) => Self::List(Box::new(Self::of_type(elem, name_of))),
                Container::Set(elem) => Self::Set(Box::new(Self::of_type(elem, name_of))),
                Container::VarArray(elem) => {
                    Self::VarArray(Box::new(Self::of_type(elem, name_of)))
                }
                Container::FixedArray(elem, length) => {
                    Self::FixedArray(Box::new(Self::of_type(elem, name_of)), *length)
                }
                Container::Map(key, value) => Self::Map(vec![
                    Self::of_type(key, name_of),
                    Self::of_type(value, name_of),
                ]),
            },
        }
    }
}

impl fmt::Display for TypeSpelling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(elem) => write!(f, "list<{elem}>"),
            Self::Set(elem) => write!(f, "set<{elem}>"),
            Self::VarArray(elem) => write!(f, "{elem}[]"),
            Self::FixedArray(elem, length) => write!(f, "{elem}[{length}]"),
            Self::Map(args) => {
                f.write_str("map<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
        }
    }
}

struct SpellingParser<'a> {
    text: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl SpellingParser<'_> {
    fn malformed(&self, reason: String) -> TypeMappingError {
        TypeMappingError::Malformed {
            spelling: self.text.to_string(),
            reason,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn expect(&mut self, expected: char) -> Result<(), TypeMappingError> {
        self.skip_whitespace();
        match self.chars.next() {
            Some((_, c)) if c == expected => Ok(()),
            Some((pos, c)) => Err(self.malformed(format!(
                "expected '{expected}' but found '{c}' at offset {pos}"
            ))),
            None => Err(self.malformed(format!("expected '{expected}' but input ended"))),
        }
    }

    fn parse_ident(&mut self) -> Result<String, TypeMappingError> {
        self.skip_whitespace();
        let mut ident = String::new();
        match self.chars.peek() {
            Some(&(_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
            Some(&(pos, c)) => {
                return Err(self.malformed(format!("expected a type name at offset {pos}, found '{c}'")));
            }
            None => return Err(self.malformed("expected a type name".to_string())),
        }
        while let Some((_, c)) = self
            .chars
            .next_if(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
        {
            ident.push(c);
        }
        Ok(ident)
    }

    fn parse_type(&mut self) -> Result<TypeSpelling, TypeMappingError> {
        let ident = self.parse_ident()?;
        self.skip_whitespace();

        let mut spelling = if self.chars.next_if(|(_, c)| *c == '<').is_some() {
            let mut args = vec![self.parse_type()?];
            loop {
                self.skip_whitespace();
                match self.chars.next() {
                    Some((_, ',')) => args.push(self.parse_type()?),
                    Some((_, '>')) => break,
                    Some((pos, c)) => {
                        return Err(self.malformed(format!("unexpected '{c}' at offset {pos}")));
                    }
                    None => return Err(self.malformed("unclosed '<'".to_string())),
                }
            }
            self.generic(&ident, args)?
        } else {
            TypeSpelling::Named(ident)
        };

        loop {
            self.skip_whitespace();
            if self.chars.next_if(|(_, c)| *c == '[').is_none() {
                break;
            }
            self.skip_whitespace();
            let mut digits = String::new();
            while let Some((_, c)) = self.chars.next_if(|(_, c)| c.is_ascii_digit()) {
                digits.push(c);
            }
            self.expect(']')?;
            spelling = if digits.is_empty() {
                TypeSpelling::VarArray(Box::new(spelling))
            } else {
                let length = digits
                    .parse()
                    .map_err(|_| self.malformed(format!("array length '{digits}' is too large")))?;
                TypeSpelling::FixedArray(Box::new(spelling), length)
            };
        }

        Ok(spelling)
    }

    fn generic(
        &self,
        ident: &str,
        mut args: Vec<TypeSpelling>,
    ) -> Result<TypeSpelling, TypeMappingError> {
        let lowercase = ident.to_ascii_lowercase();
        match (lowercase.as_str(), args.len()) {
            ("list", 1) => Ok(TypeSpelling::List(Box::new(args.remove(0)))),
            ("set", 1) => Ok(TypeSpelling::Set(Box::new(args.remove(0)))),
            ("map", n) if n >= 2 => Ok(TypeSpelling::Map(args)),
            ("list" | "set" | "map", n) => Err(self.malformed(format!(
                "{lowercase} does not take {n} type argument(s)"
            ))),
            _ => Err(self.malformed(format!("'{ident}' is not a generic container"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<DeclId> {
        match name {
            "Person" => Some(DeclId::new(0)),
            "Employee" => Some(DeclId::new(1)),
            _ => None,
        }
    }

    fn resolve(text: &str) -> Result<Type, TypeMappingError> {
        TypeSpelling::parse(text)?.resolve(&lookup)
    }

    #[test]
    fn test_resolve_primitives() {
        assert_eq!(resolve("i32").unwrap(), Type::Primitive(PrimitiveKind::I32));
        assert_eq!(resolve(" bool ").unwrap(), Type::Primitive(PrimitiveKind::Bool));
        assert_eq!(resolve("annotation").unwrap(), Type::Annotation);
    }

    #[test]
    fn test_string_is_never_a_reference() {
        let lookup_string = |name: &str| (name == "string").then(|| DeclId::new(9));
        let ty = TypeSpelling::parse("string")
            .unwrap()
            .resolve(&lookup_string)
            .unwrap();
        assert_eq!(ty, Type::Primitive(PrimitiveKind::String));
    }

    #[test]
    fn test_resolve_nested_containers() {
        let ty = resolve("list<map<string, i32>>").unwrap();
        assert_eq!(
            ty,
            Type::list(Type::map(
                Type::Primitive(PrimitiveKind::String),
                Type::Primitive(PrimitiveKind::I32)
            ))
        );
    }

    #[test]
    fn test_map_arguments_nest_right() {
        let ty = resolve("map<Person, string, f64>").unwrap();
        assert_eq!(
            ty,
            Type::map(
                Type::Reference(DeclId::new(0)),
                Type::map(
                    Type::Primitive(PrimitiveKind::String),
                    Type::Primitive(PrimitiveKind::F64)
                )
            )
        );
    }

    #[test]
    fn test_arrays() {
        assert_eq!(
            resolve("i8[4]").unwrap(),
            Type::fixed_array(Type::Primitive(PrimitiveKind::I8), 4)
        );
        assert_eq!(
            resolve("Employee[]").unwrap(),
            Type::var_array(Type::Reference(DeclId::new(1)))
        );
        assert_eq!(
            resolve("i8[2][]").unwrap(),
            Type::var_array(Type::fixed_array(Type::Primitive(PrimitiveKind::I8), 2))
        );
    }

    #[test]
    fn test_unknown_name_fails_closed() {
        let err = resolve("i33").unwrap_err();
        assert_eq!(
            err,
            TypeMappingError::UnknownType {
                spelling: "i33".to_string()
            }
        );
        assert!(matches!(resolve("list<Persn>"), Err(TypeMappingError::UnknownType { .. })));
    }

    #[test]
    fn test_malformed_spellings() {
        for text in ["", "list<i32", "list<>", "map<i32>", "set<i32, i32>", "i32[x]", "i32 i64", "foo<i32>", "<i32>"] {
            assert!(
                matches!(TypeSpelling::parse(text), Err(TypeMappingError::Malformed { .. })),
                "expected '{text}' to be malformed"
            );
        }
    }

    #[test]
    fn test_malformed_error_names_full_text() {
        let err = TypeSpelling::parse("list<i32").unwrap_err();
        let TypeMappingError::Malformed { spelling, .. } = err else {
            panic!("expected malformed error");
        };
        assert_eq!(spelling, "list<i32");
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["list<map<string, i32>>", "set<Person>", "i8[4]", "Person[]", "map<i32, map<string, f64>>"] {
            assert_eq!(TypeSpelling::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_of_type() {
        let ty = Type::map(Type::Reference(DeclId::new(0)), Type::Annotation);
        let name_of = |id: DeclId| (id.index() == 0).then(|| "Person".to_string());
        assert_eq!(TypeSpelling::of_type(&ty, &name_of).to_string(), "map<Person, annotation>");
    }
}
