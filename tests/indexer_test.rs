//! Tests for Indexer adjacency maintenance

use std::collections::HashSet;

use rstest::{fixture, rstest};

use treegrid::{Indexer, ItemId, ParentId, Repository, TreeItem};

// 1
// ├── 2
// │   └── 4
// └── 3
// 5
#[fixture]
fn repo() -> Repository {
    Repository::from_items(vec![
        TreeItem::labeled(1, ParentId::Root, "A"),
        TreeItem::labeled(2, ItemId::from(1), "B"),
        TreeItem::labeled(3, ItemId::from(1), "C"),
        TreeItem::labeled(4, ItemId::from(2), "D"),
        TreeItem::labeled(5, ParentId::Root, "E"),
    ])
    .unwrap()
}

fn ids(items: &[&TreeItem]) -> Vec<ItemId> {
    items.iter().map(|i| i.id.clone()).collect()
}

fn id_set(items: &[&TreeItem]) -> HashSet<ItemId> {
    items.iter().map(|i| i.id.clone()).collect()
}

#[rstest]
fn given_items_when_rebuilding_then_children_in_insertion_order(repo: Repository) {
    let indexer = Indexer::from_items(repo.iter_indexed());

    assert_eq!(
        ids(&indexer.get_children(&repo, &ItemId::from(1))),
        vec![ItemId::from(2), ItemId::from(3)]
    );
    assert_eq!(
        ids(&indexer.get_root_items(&repo)),
        vec![ItemId::from(1), ItemId::from(5)]
    );
    assert_eq!(indexer.len(), 5);
    assert_eq!(indexer.child_count(&ItemId::from(1)), 2);
}

#[rstest]
#[case::leaf(ItemId::from(4))]
#[case::unknown(ItemId::from(999))]
#[case::same_digits_as_string(ItemId::from("1"))]
fn given_id_without_children_when_getting_children_then_empty(repo: Repository, #[case] id: ItemId) {
    let indexer = Indexer::from_items(repo.iter_indexed());

    assert!(indexer.get_children(&repo, &id).is_empty());
    assert!(indexer.get_all_children(&repo, &id).is_empty());
}

#[rstest]
fn given_nested_items_when_getting_all_children_then_returns_descendant_set(repo: Repository) {
    let indexer = Indexer::from_items(repo.iter_indexed());

    let all = indexer.get_all_children(&repo, &ItemId::from(1));

    assert_eq!(all.len(), 3);
    assert_eq!(
        id_set(&all),
        HashSet::from([ItemId::from(2), ItemId::from(3), ItemId::from(4)])
    );
}

#[rstest]
#[case(ItemId::from(4), vec![4, 2, 1])]
#[case(ItemId::from(3), vec![3, 1])]
#[case(ItemId::from(5), vec![5])]
fn given_item_when_getting_all_parents_then_chain_up_to_root(
    repo: Repository,
    #[case] id: ItemId,
    #[case] expected: Vec<i64>,
) {
    let indexer = Indexer::from_items(repo.iter_indexed());

    let chain = indexer.get_all_parents(&repo, &id);

    let expected: Vec<ItemId> = expected.into_iter().map(ItemId::from).collect();
    assert_eq!(ids(&chain), expected);
    assert!(chain.last().unwrap().parent.is_root());
}

#[rstest]
fn given_unknown_id_when_getting_all_parents_then_empty(repo: Repository) {
    let indexer = Indexer::from_items(repo.iter_indexed());

    assert!(indexer.get_all_parents(&repo, &ItemId::from(42)).is_empty());
}

#[test]
fn given_dangling_chain_when_getting_all_parents_then_stops_at_missing_parent() {
    // Arrange: 3 -> 2 -> (missing 1)
    let repo = Repository::from_items(vec![
        TreeItem::labeled(2, ItemId::from(1), "B"),
        TreeItem::labeled(3, ItemId::from(2), "C"),
    ])
    .unwrap();
    let indexer = Indexer::from_items(repo.iter_indexed());

    // Act
    let chain = indexer.get_all_parents(&repo, &ItemId::from(3));

    // Assert
    assert_eq!(ids(&chain), vec![ItemId::from(3), ItemId::from(2)]);
    assert!(indexer.get_root_items(&repo).is_empty());
}

#[test]
fn given_cyclic_input_when_traversing_then_terminates() {
    // Arrange: 1 -> 2 -> 1, never produced by the service but loadable as raw data
    let repo = Repository::from_items(vec![
        TreeItem::labeled(1, ItemId::from(2), "A"),
        TreeItem::labeled(2, ItemId::from(1), "B"),
    ])
    .unwrap();
    let indexer = Indexer::from_items(repo.iter_indexed());

    // Act
    let parents = indexer.get_all_parents(&repo, &ItemId::from(1));
    let children = indexer.get_all_children(&repo, &ItemId::from(1));

    // Assert
    assert_eq!(ids(&parents), vec![ItemId::from(1), ItemId::from(2)]);
    assert_eq!(ids(&children), vec![ItemId::from(2)]);
}

#[rstest]
fn given_new_item_when_adding_then_appended_to_siblings(mut repo: Repository) {
    let mut indexer = Indexer::from_items(repo.iter_indexed());

    let (idx, stored) = repo.save(TreeItem::labeled(6, ItemId::from(1), "F")).unwrap();
    indexer.add_item(idx, stored);

    assert_eq!(
        ids(&indexer.get_children(&repo, &ItemId::from(1))),
        vec![ItemId::from(2), ItemId::from(3), ItemId::from(6)]
    );
    assert!(indexer.contains(&ItemId::from(6)));
}

#[rstest]
fn given_item_when_removing_then_children_not_cascaded(repo: Repository) {
    let mut indexer = Indexer::from_items(repo.iter_indexed());

    indexer.remove_item(&ItemId::from(2));

    assert_eq!(
        ids(&indexer.get_children(&repo, &ItemId::from(1))),
        vec![ItemId::from(3)]
    );
    assert!(!indexer.contains(&ItemId::from(2)));
    // 4 still listed under its (now unindexed) parent
    assert_eq!(indexer.child_count(&ItemId::from(2)), 1);

    indexer.remove_item(&ItemId::from(2));
    assert_eq!(indexer.len(), 4);
}

#[rstest]
fn given_same_parent_when_updating_then_sibling_position_kept(mut repo: Repository) {
    let mut indexer = Indexer::from_items(repo.iter_indexed());

    let (idx, stored) = repo.update(TreeItem::labeled(2, ItemId::from(1), "B2")).unwrap();
    indexer.update_item(idx, stored, &ParentId::Item(ItemId::from(1)));

    let children = indexer.get_children(&repo, &ItemId::from(1));
    assert_eq!(ids(&children), vec![ItemId::from(2), ItemId::from(3)]);
    assert_eq!(children[0].attributes["label"], "B2");
}

#[rstest]
fn given_new_parent_when_updating_then_moved_between_sibling_lists(mut repo: Repository) {
    let mut indexer = Indexer::from_items(repo.iter_indexed());

    let (idx, stored) = repo.update(TreeItem::labeled(2, ItemId::from(5), "B")).unwrap();
    indexer.update_item(idx, stored, &ParentId::Item(ItemId::from(1)));

    assert_eq!(
        ids(&indexer.get_children(&repo, &ItemId::from(1))),
        vec![ItemId::from(3)]
    );
    assert_eq!(
        ids(&indexer.get_children(&repo, &ItemId::from(5))),
        vec![ItemId::from(2)]
    );
    assert_eq!(
        ids(&indexer.get_all_parents(&repo, &ItemId::from(4))),
        vec![ItemId::from(4), ItemId::from(2), ItemId::from(5)]
    );
}

#[rstest]
fn given_child_when_promoting_to_root_then_listed_as_root(mut repo: Repository) {
    let mut indexer = Indexer::from_items(repo.iter_indexed());

    let (idx, stored) = repo.update(TreeItem::labeled(4, ParentId::Root, "D")).unwrap();
    indexer.update_item(idx, stored, &ParentId::Item(ItemId::from(2)));

    assert_eq!(
        ids(&indexer.get_root_items(&repo)),
        vec![ItemId::from(1), ItemId::from(5), ItemId::from(4)]
    );
    assert!(indexer.get_children(&repo, &ItemId::from(2)).is_empty());
}

#[rstest]
fn given_children_map_then_partitions_non_root_items(repo: Repository) {
    let indexer = Indexer::from_items(repo.iter_indexed());

    let mut seen = Vec::new();
    for item in repo.find_all() {
        seen.extend(ids(&indexer.get_children(&repo, &item.id)));
    }
    seen.sort();

    let mut non_root: Vec<ItemId> = repo
        .find_all()
        .into_iter()
        .filter(|i| !i.parent.is_root())
        .map(|i| i.id.clone())
        .collect();
    non_root.sort();
    assert_eq!(seen, non_root);
}
