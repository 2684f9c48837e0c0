//! Name trees, ISO 32000-1:2008 Section 7.9.6.
//!
//! Only the embedded files tree (`/Root /Names /EmbeddedFiles`) is walked
//! here, but [`walk_name_tree`] works for any name tree.

use super::context::ValidationContext;
use super::entry::{
    validate_array_entry, validate_dict_entry, validate_name_entry, validate_string_array_entry,
};
use crate::encoding::decode_text_string;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::HashSet;
use crate::version::PdfVersion;

const ROOT_DICT: &str = "rootDict";
const NAME_DICT: &str = "nameDict";
const NAME_TREE_NODE: &str = "nameTreeNode";

/// Locate the embedded files name tree through the document catalog.
///
/// Returns `None` when the catalog has no `/Names` dictionary or that
/// dictionary has no `/EmbeddedFiles` entry.
pub fn embedded_files_tree(ctx: &ValidationContext<'_>) -> Result<Option<Dictionary>> {
    let catalog = ctx.catalog()?;

    validate_name_entry(
        ctx,
        &catalog,
        ROOT_DICT,
        "Type",
        true,
        PdfVersion::V1_0,
        Some(&|s: &String| s == "Catalog"),
    )?;

    let names =
        validate_dict_entry(ctx, &catalog, ROOT_DICT, "Names", false, PdfVersion::V1_2, None)?;
    let names = match names {
        Some(names) => names,
        None => return Ok(None),
    };

    validate_dict_entry(ctx, &names, NAME_DICT, "EmbeddedFiles", false, PdfVersion::V1_4, None)
}

/// Walk a name tree, calling `visit(key, value, depth)` for every leaf entry
/// in the order stored.
///
/// Values are handed over as stored, possibly as references. Malformed
/// nodes abort the walk; so does any error returned by `visit`. A node
/// reached twice through `/Kids` is malformed, since the tree must not
/// share nodes.
pub fn walk_name_tree<F>(
    ctx: &ValidationContext<'_>,
    node: &Dictionary,
    depth: u32,
    visit: &mut F,
) -> Result<()>
where
    F: FnMut(&str, Object, u32) -> Result<()>,
{
    let mut visited = HashSet::new();
    walk_node(ctx, node, depth, &mut visited, visit)
}

fn walk_node<F>(
    ctx: &ValidationContext<'_>,
    node: &Dictionary,
    depth: u32,
    visited: &mut HashSet<ObjectRef>,
    visit: &mut F,
) -> Result<()>
where
    F: FnMut(&str, Object, u32) -> Result<()>,
{
    let depth = ctx.descend(depth)?;

    validate_string_array_entry(
        ctx,
        node,
        NAME_TREE_NODE,
        "Limits",
        false,
        PdfVersion::V1_0,
        Some(&|limits: &Vec<Vec<u8>>| limits.len() == 2),
    )?;

    let kids =
        validate_array_entry(ctx, node, NAME_TREE_NODE, "Kids", false, PdfVersion::V1_0, None)?;
    for (i, kid) in kids.iter().flatten().enumerate() {
        if let Some(kid_ref) = kid.as_reference() {
            if !visited.insert(kid_ref) {
                let field = format!("Kids[{}]", i);
                return Err(Error::violation(
                    NAME_TREE_NODE,
                    &field,
                    format!("node {} already visited", kid_ref),
                ));
            }
        }

        match ctx.dereference(kid)? {
            Object::Dictionary(child) => walk_node(ctx, &child, depth, visited, visit)?,
            other => {
                let field = format!("Kids[{}]", i);
                return Err(Error::mismatch(
                    NAME_TREE_NODE,
                    &field,
                    "Dictionary",
                    other.type_name(),
                ));
            },
        }
    }

    let names =
        validate_array_entry(ctx, node, NAME_TREE_NODE, "Names", false, PdfVersion::V1_0, None)?;
    if let Some(names) = names {
        if names.len() % 2 != 0 {
            return Err(Error::violation(
                NAME_TREE_NODE,
                "Names",
                format!("odd number of elements ({})", names.len()),
            ));
        }

        for (i, pair) in names.chunks_exact(2).enumerate() {
            let key = match ctx.dereference(&pair[0])? {
                Object::String(bytes) | Object::HexString(bytes) => decode_text_string(&bytes)
                    .ok_or_else(|| {
                        Error::violation(NAME_TREE_NODE, "Names", "invalid text string key")
                    })?,
                other => {
                    let field = format!("Names[{}]", 2 * i);
                    return Err(Error::mismatch(
                        NAME_TREE_NODE,
                        &field,
                        "String",
                        other.type_name(),
                    ));
                },
            };

            visit(&key, pair[1].clone(), depth)?;
        }
    }

    Ok(())
}
