//! End-to-end tests: the tree engine and editor driving a live server.

mod helpers;

use diagramhub_core::{ItemId, UserId};
use diagramhub_entity::item::CreateItem;
use diagramhub_service::{ClickModifiers, DropTarget, TreeEngine, templates};
use diagramhub_storage::ItemGateway;

use helpers::TestServer;

fn row_id(engine: &TreeEngine, name: &str) -> ItemId {
    engine
        .rows()
        .iter()
        .find(|r| r.name == name)
        .map(|r| r.id.clone())
        .unwrap_or_else(|| panic!("no row named {name}"))
}

#[tokio::test]
async fn test_create_confirm_swaps_temp_row_for_server_row() {
    let server = TestServer::spawn().await;
    let user = UserId::new();
    let mut ws = server.workspace(user).await;

    let engine = ws.engine_mut();
    let folder_temp = engine.create_folder(None, None);
    engine.confirm_create(&folder_temp, "Designs").unwrap();
    engine.settle().await;
    let folder = row_id(engine, "Designs");

    let file_temp = engine.create_file(Some(&folder), None);
    assert!(engine.is_expanded(&folder));
    engine.confirm_create(&file_temp, "Flow Chart").unwrap();
    engine.settle().await;

    let file = row_id(engine, "Flow Chart.mmd");
    assert!(engine.find_by_id(&file_temp).is_none());
    assert!(engine.pending().is_empty());
    assert_eq!(
        engine.url_path(&file).as_deref(),
        Some("/files/designs/flow-chart")
    );
    assert_eq!(
        engine.find_by_path("/files/designs/flow-chart").map(|n| n.id.clone()),
        Some(file.clone())
    );

    let listed = server.gateway(user).list_items().await.unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn test_rename_conflict_rolls_back_over_http() {
    let server = TestServer::spawn().await;
    let user = UserId::new();
    let gateway = server.gateway(user);
    for name in ["A", "B"] {
        gateway
            .create_item(CreateItem {
                parent_id: None,
                name: name.to_string(),
                is_folder: false,
            })
            .await
            .unwrap();
    }

    let mut ws = server.workspace(user).await;
    let mut notifications = ws.subscribe();
    let engine = ws.engine_mut();
    let a = row_id(engine, "A.mmd");

    engine.start_renaming(&a);
    engine.finish_renaming(&a, "B").unwrap().unwrap();
    assert_eq!(engine.find_by_id(&a).unwrap().name, "B.mmd");

    engine.settle().await;
    assert_eq!(engine.find_by_id(&a).unwrap().name, "A.mmd");
    let note = notifications.try_recv().unwrap();
    assert_eq!(
        note.message,
        "Failed to rename: An item named 'B.mmd' already exists in this folder"
    );
}

#[tokio::test]
async fn test_multi_select_drag_moves_into_folder() {
    let server = TestServer::spawn().await;
    let user = UserId::new();
    let mut ws = server.workspace(user).await;

    {
        let engine = ws.engine_mut();
        let temp = engine.create_folder(None, None);
        engine.confirm_create(&temp, "Target").unwrap();
        for name in ["One", "Two"] {
            let temp = engine.create_file(None, None);
            engine.confirm_create(&temp, name).unwrap();
        }
        engine.settle().await;
    }

    let folder = row_id(ws.engine(), "Target");
    let one = row_id(ws.engine(), "One.mmd");
    let two = row_id(ws.engine(), "Two.mmd");

    let url = ws.engine_mut().handle_item_click(&one, ClickModifiers::plain());
    assert_eq!(url.as_deref(), Some("/files/one"));
    ws.engine_mut().handle_item_click(&two, ClickModifiers::meta());
    assert!(ws.engine().is_multi_selected());

    ws.mark_ready();
    assert!(ws.drag_start(&one));
    assert_eq!(ws.dnd().dragged_ids().len(), 2);
    let tickets = ws.drag_end(Some(DropTarget::Item(folder.clone())));
    assert_eq!(tickets.len(), 2);
    ws.engine_mut().settle().await;

    assert!(ws.engine().is_located_at(&one, Some(&folder)));
    assert!(ws.engine().is_located_at(&two, Some(&folder)));
    assert!(ws.engine().is_expanded(&folder));

    let fresh = server.workspace(user).await;
    assert!(fresh.engine().is_located_at(&one, Some(&folder)));
    assert_eq!(fresh.engine().items().len(), 1);
    assert_eq!(fresh.engine().items()[0].children().len(), 2);
}

#[tokio::test]
async fn test_delete_folder_removes_subtree_everywhere() {
    let server = TestServer::spawn().await;
    let user = UserId::new();
    let mut ws = server.workspace(user).await;

    let engine = ws.engine_mut();
    let temp = engine.create_folder(None, None);
    engine.confirm_create(&temp, "Old").unwrap();
    engine.settle().await;
    let folder = row_id(engine, "Old");
    let temp = engine.create_file(Some(&folder), None);
    engine.confirm_create(&temp, "Child").unwrap();
    engine.settle().await;
    let child = row_id(engine, "Child.mmd");

    engine.handle_item_click(&child, ClickModifiers::plain());
    engine.delete_item(&folder).unwrap();
    assert!(engine.items().is_empty());
    assert!(!engine.is_selected(&child));
    engine.settle().await;

    assert!(engine.rows().is_empty());
    assert!(server.gateway(user).list_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_template_and_autosave_persist_content() {
    let server = TestServer::spawn().await;
    let user = UserId::new();
    let mut ws = server.workspace(user).await;
    let sequence = templates::find("sequence").unwrap();

    ws.engine_mut().create_from_template(sequence);
    ws.engine_mut().settle().await;
    let id = row_id(ws.engine(), "Sequence.mmd");
    assert_eq!(ws.engine().ui().selected_id.as_ref(), Some(&id));

    let gateway = server.gateway(user);
    assert_eq!(gateway.get_content(&id).await.unwrap().content, sequence.content);

    let mut doc = ws.open_document(&id).await.unwrap();
    assert_eq!(doc.text(), sequence.content);
    doc.edit("sequenceDiagram\n    A->>B: Hi").unwrap();
    assert!(doc.has_pending_save());
    doc.flush().await.unwrap();

    assert_eq!(
        gateway.get_content(&id).await.unwrap().content,
        "sequenceDiagram\n    A->>B: Hi"
    );
    let versions = ws.versions(&id).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].content, sequence.content);
}
