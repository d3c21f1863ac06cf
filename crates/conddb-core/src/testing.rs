//! Shared history used across the query tests.

use conddb_backend::{Backend, MemoryBackend, SnapshotBuilder};
use conddb_types::ObjectId;

pub(crate) struct Conditions {
    pub backend: MemoryBackend,
    pub at_10: ObjectId,
    pub at_120: ObjectId,
    pub at_200: ObjectId,
}

/// History on `main`:
///
/// | time | change |
/// |------|--------|
/// | 10   | `README`, `tracker/gas/temperature` = 293 |
/// | 50   | `tracker/gas/pressure` = 1013 |
/// | 50   | `tracker/gas/pressure` = 1015 |
/// | 120  | `tracker/gas/temperature` = 295 |
/// | 200  | `tracker/gas/pressure` = 990, `external` link added |
///
/// Tags: `v1.0.0` and `calib` name the checkpoint at 120 (annotated and
/// lightweight), `tree-only` names its tree, `snapshot-label` is an
/// annotated tag on that tree and `meta-label` an annotated tag on `v1.0.0`.
pub(crate) fn conditions() -> Conditions {
    let backend = MemoryBackend::new();
    let mut snap = SnapshotBuilder::new();

    snap.file("README", "conditions")
        .file("tracker/gas/temperature", "293");
    let at_10 = backend.commit("main", &snap, 10, "initial").unwrap();

    snap.file("tracker/gas/pressure", "1013");
    backend.commit("main", &snap, 50, "pressure online").unwrap();
    snap.file("tracker/gas/pressure", "1015");
    backend.commit("main", &snap, 50, "pressure recalibrated").unwrap();

    snap.file("tracker/gas/temperature", "295");
    let at_120 = backend.commit("main", &snap, 120, "temperature drift").unwrap();

    snap.file("tracker/gas/pressure", "990").link("external", at_10);
    let at_200 = backend.commit("main", &snap, 200, "pressure drop").unwrap();
    backend.set_head("main").unwrap();

    let tree_120 = backend.read_checkpoint(&at_120).unwrap().snapshot;
    let v1 = backend.tag_annotated("v1.0.0", at_120, "release").unwrap();
    backend.tag_lightweight("calib", at_120).unwrap();
    backend.tag_lightweight("tree-only", tree_120).unwrap();
    backend
        .tag_annotated("snapshot-label", tree_120, "tree")
        .unwrap();
    backend.tag_annotated("meta-label", v1, "nested").unwrap();

    Conditions {
        backend,
        at_10,
        at_120,
        at_200,
    }
}
