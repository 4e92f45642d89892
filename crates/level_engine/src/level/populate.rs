//! Attribute populate loop for controller bodies

use super::coerce::{coerce, Value, ValueType};
use super::cursor::{LineCursor, SourceLine};
use super::error::LevelError;
use super::variables::VariableTable;
use crate::controllers::{AttributeSlot, AttributeTable, Controller};

/// Block kinds reported by [`LevelError::UnexpectedEndOfInput`]
const CONTROLLER_BLOCK: &str = "Controller";
const SEQUENCE_BLOCK: &str = "sequence attribute";
const MAP_BLOCK: &str = "map attribute";

/// Set attributes on `controller` from the lines following its header, up to
/// and including the closing `End`
pub fn populate(
    controller: &mut dyn Controller,
    table: &AttributeTable,
    cursor: &mut LineCursor<'_>,
    variables: &VariableTable,
) -> Result<(), LevelError> {
    loop {
        let line = cursor.next_line(variables).ok_or(LevelError::UnexpectedEndOfInput {
            block: CONTROLLER_BLOCK,
        })?;
        if line.is_terminator() {
            return Ok(());
        }

        let tokens = line.tokens();
        let name = line.keyword();
        let attribute = table.get(name).ok_or_else(|| LevelError::UnknownAttribute {
            name: name.to_string(),
            controller: table.type_name(),
        })?;
        log::trace!("line {}: {}.{}", line.number, table.type_name(), name);

        match attribute.slot() {
            AttributeSlot::Scalar { value, set } => {
                let value = coerce(*value, &tokens, 1, true)?;
                set(&mut *controller, value)?;
            }
            AttributeSlot::Sequence { element, set } => {
                let elements = read_sequence(*element, cursor, variables)?;
                set(&mut *controller, elements)?;
            }
            AttributeSlot::Map { key, value, insert } => {
                for_each_block_line(cursor, variables, MAP_BLOCK, |entry| {
                    let tokens = entry.tokens();
                    let key = coerce(*key, &tokens, 0, false)?;
                    let value = coerce(*value, &tokens, 1, true)?;
                    insert(&mut *controller, key, value)
                })?;
            }
        }
    }
}

fn read_sequence(
    element: ValueType,
    cursor: &mut LineCursor<'_>,
    variables: &VariableTable,
) -> Result<Vec<Value>, LevelError> {
    let mut elements = Vec::new();
    for_each_block_line(cursor, variables, SEQUENCE_BLOCK, |line| {
        elements.push(coerce(element, &line.tokens(), 0, true)?);
        Ok(())
    })?;
    Ok(elements)
}

/// Feed every line of a nested block to `f`, consuming the block's `End`
fn for_each_block_line(
    cursor: &mut LineCursor<'_>,
    variables: &VariableTable,
    block: &'static str,
    mut f: impl FnMut(&SourceLine) -> Result<(), LevelError>,
) -> Result<(), LevelError> {
    loop {
        let line = cursor
            .next_line(variables)
            .ok_or(LevelError::UnexpectedEndOfInput { block })?;
        if line.is_terminator() {
            return Ok(());
        }
        f(&line)?;
    }
}
