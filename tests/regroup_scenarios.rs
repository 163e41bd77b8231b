//! End-to-end regrouping scenarios through the library API.

use coco_regroup::ir::io_coco_json::{from_dataset_str, to_dataset_string};
use coco_regroup::ir::{CategoryId, Dataset, ImageId};
use coco_regroup::policy::PolicyRegistry;
use coco_regroup::regroup::{run_pipeline, RegroupIssueCode};
use coco_regroup::RegroupError;
use serde_json::json;

fn gyn_dataset(annotations: serde_json::Value) -> Dataset {
    let doc = json!({
        "images": [{"id": 100}, {"id": 101}],
        "annotations": annotations,
        "categories": [
            {"id": 1, "name": "polipo"},
            {"id": 2, "name": "mioma"},
            {"id": 3, "name": "K"}
        ]
    });
    from_dataset_str(&doc.to_string()).expect("parse dataset")
}

fn both_annotations() -> serde_json::Value {
    json!([
        {"id": 10, "image_id": 100, "category_id": 1},
        {"id": 11, "image_id": 101, "category_id": 3}
    ])
}

fn to_value(dataset: &Dataset) -> serde_json::Value {
    serde_json::from_str(&to_dataset_string(dataset).expect("serialize")).expect("reparse")
}

#[test]
fn default_policy_groups_categories() {
    let registry = PolicyRegistry::builtin();
    let outcome = run_pipeline(gyn_dataset(both_annotations()), &registry, "default")
        .expect("pipeline");

    assert_eq!(
        to_value(&outcome.dataset),
        json!({
            "images": [{"id": 100}, {"id": 101}],
            "annotations": [
                {"id": 10, "image_id": 100, "category_id": 1},
                {"id": 11, "image_id": 101, "category_id": 3}
            ],
            "categories": [
                {"id": 1, "name": "focale", "supercategory": "", "color": "#fc0000", "metadata": {}, "keypoint_colors": []},
                {"id": 2, "name": "disnormale", "supercategory": "", "color": "#00fc00", "metadata": {}, "keypoint_colors": []},
                {"id": 3, "name": "oncologica", "supercategory": "", "color": "#0000fc", "metadata": {}, "keypoint_colors": []}
            ]
        })
    );
}

#[test]
fn image_without_surviving_annotations_is_dropped() {
    let registry = PolicyRegistry::builtin();
    let dataset = gyn_dataset(json!([{"id": 10, "image_id": 100, "category_id": 1}]));

    let outcome = run_pipeline(dataset, &registry, "default").expect("pipeline");

    let ids: Vec<ImageId> = outcome.dataset.images.iter().map(|i| i.id()).collect();
    assert_eq!(ids, [ImageId(100)]);
    assert_eq!(outcome.report.dropped_images(), 1);
}

#[test]
fn dangling_category_reference_is_dropped_silently() {
    let registry = PolicyRegistry::builtin();
    let dataset = gyn_dataset(json!([
        {"id": 10, "image_id": 100, "category_id": 1},
        {"id": 12, "image_id": 101, "category_id": 99}
    ]));

    let outcome = run_pipeline(dataset, &registry, "default").expect("pipeline");

    assert_eq!(outcome.dataset.annotations.len(), 1);
    assert_eq!(outcome.dataset.images.len(), 1);
    assert_eq!(
        outcome
            .report
            .issues_with(RegroupIssueCode::DanglingCategoryRef)
            .count(),
        1
    );
}

#[test]
fn unknown_policy_is_rejected() {
    let registry = PolicyRegistry::builtin();
    let err = run_pipeline(gyn_dataset(both_annotations()), &registry, "bogus").unwrap_err();

    match err {
        RegroupError::UnknownPolicy { name, .. } => assert_eq!(name, "bogus"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_source_names_to_same_target_are_benign() {
    let doc = json!({
        "images": [{"id": 100}, {"id": 101}],
        "annotations": [
            {"id": 10, "image_id": 100, "category_id": 1},
            {"id": 11, "image_id": 101, "category_id": 4}
        ],
        "categories": [
            {"id": 1, "name": "polipo"},
            {"id": 4, "name": "polipo"}
        ]
    });
    let dataset = from_dataset_str(&doc.to_string()).expect("parse");
    let registry = PolicyRegistry::builtin();

    let outcome = run_pipeline(dataset, &registry, "default").expect("pipeline");

    let categories: Vec<CategoryId> = outcome
        .dataset
        .annotations
        .iter()
        .map(|a| a.category_id())
        .collect();
    assert_eq!(categories, [CategoryId(1), CategoryId(1)]);
    assert_eq!(outcome.dataset.images.len(), 2);
    assert_eq!(outcome.report.warning_count(), 0);
}

#[test]
fn category_count_matches_policy_regardless_of_input() {
    let registry = PolicyRegistry::builtin();
    let empty = from_dataset_str(r#"{"images": [], "annotations": [], "categories": []}"#)
        .expect("parse");

    let outcome = run_pipeline(empty, &registry, "binario").expect("pipeline");

    assert_eq!(outcome.dataset.categories.len(), 2);
    assert!(outcome.dataset.images.is_empty());
    assert!(outcome.dataset.annotations.is_empty());
}

#[test]
fn opaque_fields_pass_through() {
    let doc = r#"{
        "images": [{"file_name": "x.png", "id": 100, "exif": {"iso": 200}}],
        "annotations": [
            {"segmentation": [[1.10, 2.20, 3.30]], "category_id": 2, "id": 10, "image_id": 100, "custom": null}
        ],
        "categories": [{"id": 2, "name": "mioma"}]
    }"#;
    let registry = PolicyRegistry::builtin();
    let outcome = run_pipeline(from_dataset_str(doc).expect("parse"), &registry, "default")
        .expect("pipeline");

    let text = to_dataset_string(&outcome.dataset).expect("serialize");
    let expected_annotation = r#"    {
      "segmentation": [
        [
          1.10,
          2.20,
          3.30
        ]
      ],
      "category_id": 1,
      "id": 10,
      "image_id": 100,
      "custom": null
    }"#;
    assert!(text.contains(expected_annotation), "{text}");
    assert!(text.contains("\"exif\": {\n        \"iso\": 200\n      }"));
}

#[test]
fn null_optional_category_fields_are_accepted() {
    let doc = r#"{
        "images": [{"id": 100}],
        "annotations": [{"id": 10, "image_id": 100, "category_id": 1}],
        "categories": [
            {"id": 1, "name": "polipo", "supercategory": null, "metadata": null, "color": null}
        ]
    }"#;
    let registry = PolicyRegistry::builtin();
    let outcome = run_pipeline(from_dataset_str(doc).expect("parse"), &registry, "default")
        .expect("pipeline");

    let reference = run_pipeline(gyn_dataset(both_annotations()), &registry, "default")
        .expect("pipeline");
    assert_eq!(outcome.dataset.categories, reference.dataset.categories);
    assert_eq!(outcome.dataset.annotations.len(), 1);
}
