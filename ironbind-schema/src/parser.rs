//! XML schema loader.
//!
//! Reads the XML interchange form of a schema:
//!
//! ```xml
//! <schema>
//!     <type name="Employee" extends="Person">
//!         <hint name="unique"/>
//!         <field name="salary" type="i32">
//!             <hint name="owner" args="payroll audit"/>
//!         </field>
//!     </type>
//! </schema>
//! ```
//!
//! Type spellings and super type names are resolved by [`SchemaBuilder`].

use crate::builder::{DeclarationSpec, FieldSpec, SchemaBuilder};
use crate::error::{ParseError, SchemaError};
use crate::hints::{Hint, HintKind};
use crate::schema::Schema;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parses a schema from an XML string.
///
/// # Arguments
/// * `xml` - XML schema content
///
/// # Returns
/// The built schema.
///
/// # Errors
/// Returns `SchemaError::Parse` if the XML is malformed or contains unknown
/// elements or hints, and the errors of [`SchemaBuilder::build`] otherwise.
pub fn parse_schema(xml: &str) -> Result<Schema, SchemaError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut builder: Option<SchemaBuilder> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes).map_err(ParseError::from)?;
                match name {
                    "schema" if builder.is_none() => builder = Some(SchemaBuilder::new()),
                    "type" => match builder.as_mut() {
                        Some(builder) => builder.push(parse_declaration(&mut reader, e)?),
                        None => return Err(ParseError::unknown_element(name, "document").into()),
                    },
                    _ => return Err(ParseError::unknown_element(name, "schema").into()),
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes).map_err(ParseError::from)?;
                match name {
                    "schema" if builder.is_none() => builder = Some(SchemaBuilder::new()),
                    "type" => match builder.as_mut() {
                        Some(builder) => builder.push(parse_declaration_head(e)?),
                        None => return Err(ParseError::unknown_element(name, "document").into()),
                    },
                    _ => return Err(ParseError::unknown_element(name, "schema").into()),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e).into()),
            _ => {}
        }
        buf.clear();
    }

    builder
        .ok_or_else(|| ParseError::InvalidStructure {
            message: "No schema element found".to_string(),
        })?
        .build()
}

/// Reads and parses a schema file.
///
/// # Errors
/// Returns `SchemaError::Parse` if the file cannot be read, and the errors
/// of [`parse_schema`] otherwise.
pub fn parse_schema_file(path: &std::path::Path) -> Result<Schema, SchemaError> {
    let xml = std::fs::read_to_string(path).map_err(ParseError::from)?;
    parse_schema(&xml)
}

/// Parses the attributes of a `type` element.
fn parse_declaration_head(e: &BytesStart<'_>) -> Result<DeclarationSpec, ParseError> {
    let mut name = None;
    let mut super_type = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "name" => name = Some(value.to_string()),
            "extends" => super_type = Some(value.to_string()),
            _ => return Err(ParseError::invalid_attr("type", key, value)),
        }
    }

    let mut decl = DeclarationSpec::new(name.ok_or_else(|| ParseError::missing_attr("type", "name"))?);
    decl.super_type = super_type;
    Ok(decl)
}

/// Parses a `type` element with its hints and fields.
fn parse_declaration(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<DeclarationSpec, ParseError> {
    let mut decl = parse_declaration_head(e)?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let tag_name = std::str::from_utf8(&name_bytes)?;
                match tag_name {
                    "field" => {
                        let field = parse_field_head(e)?;
                        decl.fields.push(parse_field_hints(reader, field)?);
                    }
                    "hint" => {
                        decl.hints.push(parse_hint(e)?);
                        skip_to_end(reader)?;
                    }
                    _ => return Err(ParseError::unknown_element(tag_name, "type")),
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let tag_name = std::str::from_utf8(&name_bytes)?;
                match tag_name {
                    "field" => decl.fields.push(parse_field_head(e)?),
                    "hint" => decl.hints.push(parse_hint(e)?),
                    _ => return Err(ParseError::unknown_element(tag_name, "type")),
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(ParseError::InvalidStructure {
                    message: format!("unterminated type '{}'", decl.name),
                });
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(decl)
}

/// Parses the attributes of a `field` element.
fn parse_field_head(e: &BytesStart<'_>) -> Result<FieldSpec, ParseError> {
    let mut name = None;
    let mut spelling = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "name" => name = Some(value.to_string()),
            "type" => spelling = Some(value.to_string()),
            _ => return Err(ParseError::invalid_attr("field", key, value)),
        }
    }

    Ok(FieldSpec::new(
        name.ok_or_else(|| ParseError::missing_attr("field", "name"))?,
        spelling.ok_or_else(|| ParseError::missing_attr("field", "type"))?,
    ))
}

/// Parses the `hint` children of a `field` element up to its end tag.
fn parse_field_hints(
    reader: &mut Reader<&[u8]>,
    mut field: FieldSpec,
) -> Result<FieldSpec, ParseError> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let tag_name = std::str::from_utf8(&name_bytes)?;
                if tag_name != "hint" {
                    return Err(ParseError::unknown_element(tag_name, "field"));
                }
                field.hints.push(parse_hint(e)?);
                skip_to_end(reader)?;
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let tag_name = std::str::from_utf8(&name_bytes)?;
                if tag_name != "hint" {
                    return Err(ParseError::unknown_element(tag_name, "field"));
                }
                field.hints.push(parse_hint(e)?);
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(ParseError::InvalidStructure {
                    message: format!("unterminated field '{}'", field.name),
                });
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(field)
}

/// Parses a `hint` element.
///
/// `args` holds argument names separated by whitespace or commas.
fn parse_hint(e: &BytesStart<'_>) -> Result<Hint, ParseError> {
    let mut name = None;
    let mut args = Vec::new();

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "name" => name = Some(value.to_string()),
            "args" => {
                args = value
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|arg| !arg.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => return Err(ParseError::invalid_attr("hint", key, value)),
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("hint", "name"))?;
    let kind = HintKind::from_name(&name).ok_or_else(|| ParseError::UnknownHint { name: name.clone() })?;
    let rendered_args = args.join(" ");
    Hint::with_arguments(kind, args).ok_or_else(|| ParseError::invalid_attr("hint", "args", rendered_args))
}

/// Skips to the end of the current element.
fn skip_to_end(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaIntegrityError;
    use crate::types::{DeclId, PrimitiveKind, Type};

    const PERSON_SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<schema>
    <type name="Person">
        <hint name="readOnly"/>
        <field name="name" type="string"/>
        <field name="friends" type="list&lt;Person&gt;">
            <hint name="owner" args="social, graph"/>
        </field>
    </type>
    <type name="Employee" extends="Person">
        <field name="salary" type="i32"/>
    </type>
    <type name="Marker"/>
</schema>"#;

    #[test]
    fn test_parse_declarations() {
        let schema = parse_schema(PERSON_SCHEMA).expect("Failed to parse schema");

        assert_eq!(schema.len(), 3);
        let person = schema.get(DeclId::new(0)).unwrap();
        assert_eq!(person.name, "Person");
        assert!(person.is_base_type());
        assert!(person.has_hint(HintKind::ReadOnly));
        assert_eq!(person.fields.len(), 2);

        let employee = schema.get(DeclId::new(1)).unwrap();
        assert_eq!(employee.super_type, Some(DeclId::new(0)));
        assert_eq!(
            employee.fields[0].ty,
            Type::Primitive(PrimitiveKind::I32)
        );

        let marker = schema.get(DeclId::new(2)).unwrap();
        assert!(marker.fields.is_empty());
    }

    #[test]
    fn test_parse_field_hints() {
        let schema = parse_schema(PERSON_SCHEMA).expect("Failed to parse schema");
        let friends = &schema.get(DeclId::new(0)).unwrap().fields[1];
        assert_eq!(friends.ty, Type::list(Type::Reference(DeclId::new(0))));
        let owner = friends.hints.get(HintKind::Owner).unwrap();
        assert_eq!(owner.arguments(), ["social".to_string(), "graph".to_string()]);
    }

    #[test]
    fn test_unknown_hint() {
        let xml = r#"<schema><type name="A"><hint name="frozen"/></type></schema>"#;
        assert!(matches!(
            parse_schema(xml),
            Err(SchemaError::Parse(ParseError::UnknownHint { .. }))
        ));
    }

    #[test]
    fn test_arguments_on_plain_hint() {
        let xml = r#"<schema><type name="A"><hint name="unique" args="x"/></type></schema>"#;
        assert!(matches!(
            parse_schema(xml),
            Err(SchemaError::Parse(ParseError::InvalidAttribute { .. }))
        ));
    }

    #[test]
    fn test_missing_field_type() {
        let xml = r#"<schema><type name="A"><field name="x"/></type></schema>"#;
        assert!(matches!(
            parse_schema(xml),
            Err(SchemaError::Parse(ParseError::MissingAttribute { .. }))
        ));
    }

    #[test]
    fn test_unknown_element() {
        let xml = r#"<schema><type name="A"><method name="x"/></type></schema>"#;
        assert!(matches!(
            parse_schema(xml),
            Err(SchemaError::Parse(ParseError::UnknownElement { .. }))
        ));
    }

    #[test]
    fn test_no_schema_element() {
        assert!(matches!(
            parse_schema(r#"<?xml version="1.0"?>"#),
            Err(SchemaError::Parse(ParseError::InvalidStructure { .. }))
        ));
    }

    #[test]
    fn test_builder_errors_surface() {
        let xml = r#"<schema><type name="A" extends="Missing"/></schema>"#;
        assert!(matches!(
            parse_schema(xml),
            Err(SchemaError::Integrity(SchemaIntegrityError::UnknownSuperType { .. }))
        ));
    }
}
