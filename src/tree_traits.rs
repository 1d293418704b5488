/*
Terminal rendering of flattened rows.

Rows arrive in depth-first pre-order with a level per row, which is enough to
rebuild the forest shape without going back to the store.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::GridRow;

pub trait TreeNodeConvert {
    fn to_tree_strings(&self) -> Vec<Tree<String>>;
}

impl TreeNodeConvert for [GridRow] {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_strings(&self) -> Vec<Tree<String>> {
        let mut forest = Vec::new();
        let mut stack: Vec<(usize, Tree<String>)> = Vec::new();

        for row in self {
            while stack.last().is_some_and(|(level, _)| *level >= row.level) {
                fold_top(&mut stack, &mut forest);
            }
            stack.push((row.level, Tree::new(format!("{} [{}]", row.label, row.id))));
        }
        while !stack.is_empty() {
            fold_top(&mut stack, &mut forest);
        }

        forest
    }
}

// Attach the top of the stack to its parent, or to the forest if it is a root.
fn fold_top(stack: &mut Vec<(usize, Tree<String>)>, forest: &mut Vec<Tree<String>>) {
    if let Some((_, node)) = stack.pop() {
        match stack.last_mut() {
            Some((_, parent)) => {
                parent.push(node);
            }
            None => forest.push(node),
        }
    }
}
