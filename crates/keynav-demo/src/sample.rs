#![forbid(unsafe_code)]

//! Sample content: an architect menu and a zone selection grid.

use keynav::prelude::*;
use keynav::{ActivationHandler, ContentProvider};
use std::cell::Cell;
use std::rc::Rc;

/// What an architect node places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Design {
    /// A buildable structure.
    Build(&'static str),
    /// Toggle the advanced designs category.
    ToggleAdvanced,
    /// Enter deconstruct mode.
    Deconstruct,
}

fn build(id: &'static str, label: &'static str) -> TreeNode<Design> {
    TreeNode::leaf(id, label).with_payload(Design::Build(label))
}

/// Build the architect forest. The advanced category appears only when
/// `advanced` is set.
pub fn architect_forest(advanced: bool) -> Vec<TreeNode<Design>> {
    let mut roots = vec![
        TreeNode::category("structure", "Structure")
            .child(
                TreeNode::category("walls", "Walls")
                    .child(build("wall.stone", "Stone wall"))
                    .child(build("wall.wood", "Wooden wall")),
            )
            .child(TreeNode::category("doors", "Doors").child(build("door.oak", "Oak door")))
            .child(TreeNode::category("bridges", "Bridges")),
        TreeNode::category("furniture", "Furniture")
            .child(build("bed", "Bed"))
            .child(build("table", "Table"))
            .child(build("chair", "Chair")),
    ];
    if advanced {
        roots.push(
            TreeNode::category("advanced", "Advanced")
                .child(build("pump", "Pump"))
                .child(build("gearbox", "Gearbox")),
        );
    }
    roots.push(
        TreeNode::action(
            "toggle-advanced",
            if advanced { "Hide advanced designs" } else { "Show advanced designs" },
        )
        .with_payload(Design::ToggleAdvanced),
    );
    roots.push(TreeNode::action("deconstruct", "Deconstruct").with_payload(Design::Deconstruct));
    roots.push(TreeNode::info("stock", "Stockpiled: 120 wood, 40 stone"));
    roots
}

/// The architect menu over [`architect_forest`].
pub fn architect_menu()
-> TreeMenu<Design, impl ContentProvider<Design>, impl ActivationHandler<Design>> {
    let advanced = Rc::new(Cell::new(false));
    let shown = Rc::clone(&advanced);

    TreeMenu::new(
        "Architect",
        provider_fn(move || architect_forest(shown.get())),
        handler_fn(move |node: &TreeNode<Design>, out: &mut Output<'_>| {
            match node.payload().copied() {
                Some(Design::Build(name)) => {
                    out.say(&format!("Placing {name}"));
                    Activation::Close
                }
                Some(Design::ToggleAdvanced) => {
                    advanced.set(!advanced.get());
                    Activation::Rebuild
                }
                Some(Design::Deconstruct) => {
                    out.say("Deconstruct mode");
                    Activation::Close
                }
                None => {
                    out.say(&format!("{} is no longer available", node.label()));
                    Activation::Rebuild
                }
            }
        }),
    )
}

/// Square zone selection over a `size` by `size` grid, cursor in the middle.
pub fn zone_mode(size: u32) -> RectSelectMode<impl FnMut(Vec<GridCell>, &mut Output<'_>)> {
    let bounds = CellRect::from_origin(GridCell::new(0, 0), size, size);
    let middle = i32::try_from(size / 2).unwrap_or(i32::MAX);
    RectSelectMode::new(
        "Zone selection",
        bounds,
        GridCell::new(middle, middle),
        |cells: Vec<GridCell>, out: &mut Output<'_>| {
            let (Some(first), Some(last)) = (cells.first(), cells.last()) else {
                return;
            };
            tracing::info!(cells = cells.len(), %first, %last, "zone created");
            out.say(&format!(
                "Zone created with {} cells, from {first} to {last}",
                cells.len()
            ));
        },
    )
}
