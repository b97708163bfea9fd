use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cyanea_experiment::{
    ColumnData, DenseMatrix, Selector, SingleCellExperiment, SparseMatrix,
};

fn random_f64(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            (state >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect()
}

fn random_sparse(rows: usize, cols: usize, density: f64, seed: u64) -> SparseMatrix {
    let draws = random_f64(rows * cols, seed);
    let mut m = SparseMatrix::new(rows, cols);
    for (k, &u) in draws.iter().enumerate() {
        if u < density {
            m.insert(k / cols, k % cols, (u * 100.0).floor() + 1.0).unwrap();
        }
    }
    m
}

/// 2000 genes × 1000 cells with a PCA embedding and a 50-feature alt experiment.
fn experiment() -> SingleCellExperiment {
    let (genes, cells) = (2_000, 1_000);
    let counts = DenseMatrix::from_shape_vec(genes, cells, random_f64(genes * cells, 42)).unwrap();
    let spike = SingleCellExperiment::builder()
        .assay("counts", random_sparse(50, cells, 0.1, 7))
        .build()
        .unwrap();
    let batch: Vec<i64> = (0..cells as i64).map(|i| i % 4).collect();

    let mut sce = SingleCellExperiment::builder()
        .assay("counts", counts)
        .row_names((0..genes).map(|i| format!("gene{i}")))
        .col_names((0..cells).map(|i| format!("cell{i}")))
        .reduced_dim(
            "PCA",
            DenseMatrix::from_shape_vec(cells, 20, random_f64(cells * 20, 137)).unwrap(),
        )
        .alt_exp("spike", spike)
        .build()
        .unwrap();
    sce.set_col_data_column("batch", ColumnData::Integer(batch))
        .unwrap();
    sce
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    let counts = DenseMatrix::from_shape_vec(2_000, 1_000, random_f64(2_000_000, 42)).unwrap();
    group.bench_function("2k_x1k_dense", |b| {
        b.iter(|| {
            SingleCellExperiment::builder()
                .assay("counts", black_box(counts.clone()))
                .col_names((0..1_000).map(|i| format!("cell{i}")))
                .build()
        })
    });

    group.finish();
}

fn bench_subset(c: &mut Criterion) {
    let mut group = c.benchmark_group("subset");
    let sce = experiment();

    let mask: Vec<bool> = sce
        .col_data()
        .column("batch")
        .unwrap()
        .as_integer()
        .unwrap()
        .iter()
        .map(|&b| b == 1)
        .collect();
    group.bench_function("cols_by_mask", |b| {
        b.iter(|| sce.select_cols(black_box(mask.clone())))
    });

    let names = Selector::names((0..1_000).step_by(3).map(|i| format!("cell{i}")));
    group.bench_function("cols_by_name", |b| {
        b.iter(|| sce.select_cols(black_box(names.clone())))
    });

    let rows = Selector::Positions((0..2_000).step_by(2).collect());
    group.bench_function("rows_by_position", |b| {
        b.iter(|| sce.select_rows(black_box(rows.clone())))
    });

    group.finish();
}

fn bench_sparse_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse");

    let m = random_sparse(1_000, 1_000, 0.05, 99);
    let rows: Vec<usize> = (0..1_000).rev().collect();
    let cols: Vec<usize> = (0..1_000).step_by(2).collect();
    group.bench_function("select_1k_x1k_5pct", |b| {
        b.iter(|| m.select(black_box(&rows), black_box(&cols)))
    });

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let sce = experiment();
    c.bench_function("validate", |b| b.iter(|| black_box(&sce).validate()));
}

criterion_group!(
    benches,
    bench_build,
    bench_subset,
    bench_sparse_select,
    bench_validate
);
criterion_main!(benches);
