use crate::{
    storage::schema::FieldSchema,
    types::{error::DatabaseError, value::FieldKind},
};

/// One line of the textual protocol, tokenized but not yet checked against
/// the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateType {
        type_name: String,
        primary_key_order: usize,
        fields: Vec<FieldSchema>,
    },
    CreateRecord {
        type_name: String,
        values: Vec<String>,
    },
    SearchRecord {
        type_name: String,
        key: String,
    },
    DeleteRecord {
        type_name: String,
        key: String,
    },
}

impl Command {
    pub fn type_name(&self) -> &str {
        match self {
            Command::CreateType { type_name, .. }
            | Command::CreateRecord { type_name, .. }
            | Command::SearchRecord { type_name, .. }
            | Command::DeleteRecord { type_name, .. } => type_name,
        }
    }
}

fn malformed(details: impl Into<String>) -> DatabaseError {
    DatabaseError::MalformedCommand {
        details: details.into(),
    }
}

fn parse_count(token: &str, what: &str) -> Result<usize, DatabaseError> {
    token
        .parse::<usize>()
        .map_err(|_| malformed(format!("{} '{}' is not a non-negative integer", what, token)))
}

pub struct CommandParser;

impl CommandParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_command(&self, line: &str) -> Result<Command, DatabaseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["create", "type", rest @ ..] => self.parse_create_type(rest),
            ["create", "record", type_name, values @ ..] if !values.is_empty() => {
                Ok(Command::CreateRecord {
                    type_name: type_name.to_string(),
                    values: values.iter().map(|v| v.to_string()).collect(),
                })
            }
            ["search", "record", type_name, key] => Ok(Command::SearchRecord {
                type_name: type_name.to_string(),
                key: key.to_string(),
            }),
            ["delete", "record", type_name, key] => Ok(Command::DeleteRecord {
                type_name: type_name.to_string(),
                key: key.to_string(),
            }),
            [] => Err(malformed("empty command")),
            _ => Err(malformed(format!("unrecognized command '{}'", line.trim()))),
        }
    }

    // <name> <fieldCount> <primaryKeyOrder> (<fieldName> <fieldKind>){fieldCount}
    fn parse_create_type(&self, tokens: &[&str]) -> Result<Command, DatabaseError> {
        let [type_name, field_count, primary_key_order, field_tokens @ ..] = tokens else {
            return Err(malformed("create type needs a name, field count and primary key order"));
        };
        let field_count = parse_count(field_count, "field count")?;
        let primary_key_order = parse_count(primary_key_order, "primary key order")?;

        if field_tokens.len() != field_count * 2 {
            return Err(malformed(format!(
                "expected {} field name/kind pairs, got {} tokens",
                field_count,
                field_tokens.len()
            )));
        }

        let fields = field_tokens
            .chunks_exact(2)
            .map(|pair| Ok(FieldSchema::new(pair[0], FieldKind::from_string(pair[1])?)))
            .collect::<Result<Vec<_>, DatabaseError>>()?;

        Ok(Command::CreateType {
            type_name: type_name.to_string(),
            primary_key_order,
            fields,
        })
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}
