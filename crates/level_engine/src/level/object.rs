//! Object body assembly

use std::sync::OnceLock;

use super::coerce::coerce_as;
use super::cursor::{LineCursor, SourceLine, TERMINATOR};
use super::error::LevelError;
use super::model::{LevelObject, ObjectRef};
use super::populate::populate;
use super::variables::VariableTable;
use crate::assets::{AssetKind, AssetLookup};
use crate::controllers::{AttributeTable, Controller, ControllerRegistry, MeshLoaderController, TextureController};
use crate::foundation::math::{Vec2, Vec3};

/// Marker that skips a controller or texture body
pub const EMPTY_MARKER: &str = "Empty";

/// Flag marking a mesh authored Z-up
pub const Z_UP_MARKER: &str = "Z_Up";

const OBJECT_BLOCK: &str = "Object";

/// Collaborators an object body may reach
#[derive(Clone, Copy)]
pub struct ObjectContext<'a> {
    /// Controller types available to `Controller` lines
    pub registry: &'a ControllerRegistry,
    /// Asset names available to `Texture` lines
    pub assets: &'a dyn AssetLookup,
    /// Variables in effect for the body
    pub variables: &'a VariableTable,
}

/// Read an object body up to and including its `End`
pub fn read_object(
    cursor: &mut LineCursor<'_>,
    context: ObjectContext<'_>,
    reference: ObjectRef,
) -> Result<LevelObject, LevelError> {
    let mut object = LevelObject::new();

    loop {
        let line = cursor
            .next_line(context.variables)
            .ok_or(LevelError::UnexpectedEndOfInput { block: OBJECT_BLOCK })?;
        let tokens = line.tokens();
        let syntax_error = || syntax(&line, reference);

        match tokens.as_slice() {
            [TERMINATOR] => return Ok(object),
            ["Position", ..] => object.transform.position = planar_or_full(&tokens).ok_or_else(syntax_error)??,
            ["Scale", ..] => object.transform.scale = planar_or_full(&tokens).ok_or_else(syntax_error)??,
            ["Rotation", _] => object.transform.rotation = Vec3::new(0.0, 0.0, coerce_as(&tokens, 1, true)?),
            ["Rotation", _, _, _] => object.transform.rotation = coerce_as(&tokens, 1, true)?,
            ["Controller", name, marker] if *marker == EMPTY_MARKER => {
                let (controller, _) = context.registry.instantiate(name)?;
                attach(&mut object, reference, controller);
            }
            ["Controller", name] => {
                let (mut controller, table) = context.registry.instantiate(name)?;
                populate(controller.as_mut(), table, cursor, context.variables)?;
                attach(&mut object, reference, controller);
            }
            ["Mesh", _] | ["Mesh", _, _] => {
                let z_up = match tokens.get(2) {
                    None => false,
                    Some(&flag) if flag == Z_UP_MARKER => true,
                    Some(_) => return Err(syntax_error()),
                };
                let asset: String = coerce_as(&tokens, 1, false)?;
                attach(&mut object, reference, Box::new(MeshLoaderController::new(asset, z_up)));
            }
            ["Texture", name, marker] if *marker == EMPTY_MARKER => {
                let texture = texture_controller(context, name)?;
                attach(&mut object, reference, Box::new(texture));
            }
            ["Texture", name] => {
                let mut texture = texture_controller(context, name)?;
                populate(&mut texture, texture_attributes(), cursor, context.variables)?;
                attach(&mut object, reference, Box::new(texture));
            }
            _ => return Err(syntax_error()),
        }
    }
}

fn syntax(line: &SourceLine, reference: ObjectRef) -> LevelError {
    LevelError::Syntax {
        line: line.text.clone(),
        line_number: line.number,
        object: Some(reference.index()),
    }
}

/// `Keyword x y` gives `(x, y, 0)`, `Keyword x y z` gives `(x, y, z)`;
/// any other arity is `None`
fn planar_or_full(tokens: &[&str]) -> Option<Result<Vec3, LevelError>> {
    match tokens.len() {
        3 => Some(coerce_as::<Vec2>(tokens, 1, true).map(|v| Vec3::new(v.x, v.y, 0.0))),
        4 => Some(coerce_as::<Vec3>(tokens, 1, true)),
        _ => None,
    }
}

fn texture_controller(context: ObjectContext<'_>, name: &str) -> Result<TextureController, LevelError> {
    let handle = context.assets.resolve(name)?.expect_kind(name, AssetKind::Texture)?;
    Ok(TextureController::with_texture(handle))
}

/// Attributes of the `Texture` body, independent of any registry
fn texture_attributes() -> &'static AttributeTable {
    static TABLE: OnceLock<AttributeTable> = OnceLock::new();
    TABLE.get_or_init(AttributeTable::of::<TextureController>)
}

fn attach(object: &mut LevelObject, reference: ObjectRef, controller: Box<dyn Controller>) {
    log::debug!("Object {reference}: attached {}", controller.type_name());
    object.controllers.push(controller);
}
