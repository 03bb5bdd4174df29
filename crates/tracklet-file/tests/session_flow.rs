//! End-to-end session: upload, edit, undo, export, re-upload.

use std::collections::{BTreeSet, HashSet};

use tb_app_state::{ChangeKind, Grouping, Tracklet, TrackletStore};
use tb_tracklet_file::{
    format_for_export, from_json_str, load_into_store, to_json_string, ExportConfig,
    ExportDocument,
};

const UPLOAD: &str = r#"{
    "tracklets": [
        { "tracklet_id": "2", "images": [{ "name": "2_f1.jpg" }, { "name": "2_f2.jpg" }] },
        { "tracklet_id": "0", "tracklet_alias": "cyclist", "images": [{ "name": "0_f1.jpg" }] },
        { "tracklet_id": "1", "images": [{ "name": "1_f1.jpg" }, { "name": "1_f3.jpg" }] }
    ]
}"#;

fn uploaded() -> TrackletStore {
    let mut store = TrackletStore::new();
    load_into_store(&mut store, UPLOAD).expect("upload");
    store
}

fn image_names(grouping: &Grouping, tracklet_id: &str) -> Vec<String> {
    grouping
        .find(tracklet_id)
        .map(|t| t.image_names().map(str::to_string).collect())
        .unwrap_or_default()
}

fn owners(grouping: &Grouping) -> Vec<(String, String)> {
    grouping
        .iter()
        .flat_map(|t| t.image_names().map(move |n| (n.to_string(), t.id.clone())))
        .collect()
}

#[test]
fn move_then_undo_restores_initial_load() {
    let mut store = TrackletStore::new();
    store.replace_all(vec![
        Tracklet::with_images("0", ["a"]),
        Tracklet::with_images("1", ["b"]),
    ]);
    assert_eq!(store.changes().len(), 1);
    assert_eq!(store.changes().last().unwrap().kind(), ChangeKind::InitialLoad);
    let after_load = store.tracklets().clone();

    let move_id = store.move_images("0", "1", &["a"], 0).id().clone();
    assert_eq!(image_names(store.tracklets(), "1"), ["a", "b"]);
    assert!(image_names(store.tracklets(), "0").is_empty());

    store.undo(move_id.as_str()).expect("undo");
    assert_eq!(store.tracklets(), &after_load);
    assert_eq!(store.changes().len(), 1);
}

#[test]
fn merge_appends_source_after_destination() {
    let mut store = TrackletStore::new();
    store.replace_all(vec![
        Tracklet::with_images("0", ["a", "b"]),
        Tracklet::with_images("1", ["c"]),
    ]);
    store.merge_tracklets("0", "1");

    assert_eq!(store.tracklets().len(), 1);
    assert!(store.find_tracklet("0").is_none());
    assert_eq!(image_names(store.tracklets(), "1"), ["c", "a", "b"]);
}

#[test]
fn moves_never_duplicate_images() {
    let mut store = uploaded();
    let expected: HashSet<String> = owners(store.tracklets()).into_iter().map(|(n, _)| n).collect();

    store.move_images("2", "1", &["2_f1.jpg", "0_f1.jpg"], 1);
    store.move_images("1", "1", &["1_f3.jpg"], 0);
    store.move_images("1", "0", &["2_f1.jpg", "1_f1.jpg", "2_f2.jpg"], 5);

    let all = owners(store.tracklets());
    let unique: HashSet<String> = all.iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(all.len(), unique.len());
    assert_eq!(unique, expected);
}

#[test]
fn undo_any_change_restores_its_snapshot() {
    let mut store = uploaded();
    store.create_next_tracklet();
    store.move_images("2", "3", &["2_f2.jpg"], 0);
    store.rename_tracklet("3", " lost bag ");
    store.merge_tracklets("1", "0");
    store.move_images("0", "2", &["1_f1.jpg"], 0);

    let total = store.changes().len();
    assert_eq!(total, 6);
    for index in 0..total {
        let mut trial = store.clone();
        let change = trial.changes().changes()[index].clone();
        let earlier: Vec<_> = trial.changes().changes()[..index]
            .iter()
            .map(|c| c.id().clone())
            .collect();

        trial.undo(change.id().as_str()).expect("undo");
        assert_eq!(trial.tracklets(), change.previous_state());
        let remaining: Vec<_> = trial.changes().iter().map(|c| c.id().clone()).collect();
        assert_eq!(remaining, earlier);
    }
}

#[test]
fn consecutive_creates_use_increasing_ids() {
    let mut store = uploaded();
    let a = store.create_next_tracklet();
    let b = store.create_next_tracklet();
    assert_eq!(a, "3");
    assert_eq!(b, "4");
    assert_eq!(
        b.parse::<u64>().unwrap(),
        a.parse::<u64>().unwrap() + 1
    );
}

#[test]
fn export_then_reupload_round_trip() {
    let mut store = uploaded();
    store.move_images("1", "0", &["1_f3.jpg"], 0);
    store.merge_tracklets("2", "1");
    store.create_tracklet(Tracklet::new("10"));

    let config = ExportConfig::default();
    let doc = format_for_export(store.tracklets(), store.origins(), &config);
    let json = to_json_string(&doc, &config).expect("serialize");

    // Tracklets by numeric id, images sorted, names prefixed with the current id.
    let ids: Vec<&str> = doc.tracklets.iter().map(|t| t.tracklet_id.as_str()).collect();
    assert_eq!(ids, ["0", "1", "10"]);
    let zero: Vec<&str> = doc.tracklets[0].images.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(zero, ["0_0_f1.jpg", "0_1_f3.jpg"]);
    let one: Vec<&str> = doc.tracklets[1].images.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(one, ["1_1_f1.jpg", "1_2_f1.jpg", "1_2_f2.jpg"]);
    assert!(!json.contains("cyclist"));

    let mut reloaded = TrackletStore::new();
    load_into_store(&mut reloaded, &json).expect("re-upload");

    let exported_ids: BTreeSet<&str> = ids.iter().copied().collect();
    let reloaded_ids: BTreeSet<&str> = reloaded.tracklets().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(reloaded_ids, exported_ids);

    for tracklet in &doc.tracklets {
        let exported: Vec<String> = tracklet.images.iter().map(|i| i.name.clone()).collect();
        assert_eq!(image_names(reloaded.tracklets(), &tracklet.tracklet_id), exported);
    }

    // Re-exporting keeps the same order even though names gain another prefix.
    let again = format_for_export(reloaded.tracklets(), reloaded.origins(), &config);
    let again_ids: Vec<&str> = again.tracklets.iter().map(|t| t.tracklet_id.as_str()).collect();
    assert_eq!(again_ids, ids);
}

#[test]
fn exported_json_matches_document_shape() {
    let store = uploaded();
    let config = ExportConfig::default();
    let json = to_json_string(
        &format_for_export(store.tracklets(), store.origins(), &config),
        &config,
    )
    .expect("serialize");

    let doc: ExportDocument = serde_json::from_str(&json).expect("parse");
    assert_eq!(doc.tracklets.len(), 3);
    let value: serde_json::Value = serde_json::from_str(&json).expect("value");
    for tracklet in value["tracklets"].as_array().unwrap() {
        let keys: Vec<&str> = tracklet.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"tracklet_id") && keys.contains(&"images"));
    }
}

#[test]
fn second_upload_replaces_without_logging() {
    let mut store = uploaded();
    store.merge_tracklets("0", "1");
    assert_eq!(store.changes().len(), 2);

    let tracklets = from_json_str(r#"[{"tracklet_id":"7","images":[{"name":"7_x.jpg"}]}]"#)
        .expect("parse");
    assert!(store.replace_all(tracklets).is_none());
    assert_eq!(store.changes().len(), 2);
    assert_eq!(store.tracklets().len(), 1);
    assert!(store.origins().get("2_f1.jpg").is_none());
    assert!(store.origins().get("7_x.jpg").is_some());
}
