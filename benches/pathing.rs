use criterion::{
    Criterion,
    criterion_group,
    criterion_main
};
use spanning_mazes::cells::Cell;
use spanning_mazes::generators::{self, GenerateAlgorithm};
use spanning_mazes::grid::MazeGrid;
use spanning_mazes::pathing::{self, DepthFirstSolver, SolveAlgorithm};
use spanning_mazes::units::{ColumnsCount, RowsCount};
use spanning_mazes::utils::seeded_rng;

fn large_maze() -> MazeGrid {
    let mut g = MazeGrid::new(RowsCount(350), ColumnsCount(350)).unwrap();
    generators::generate(&mut g, GenerateAlgorithm::RecursiveBacktracking, &mut seeded_rng(350));
    g
}

fn bench_depth_first_path(c: &mut Criterion) {
    c.bench_function("depth_first_path", |b| {
        let g = large_maze();
        b.iter(|| DepthFirstSolver::new(&g, Cell::new(250, 250), Cell::new(0, 0)).map(|solver| solver.run()))
    });
}

fn bench_solution_grid(c: &mut Criterion) {
    c.bench_function("solution_grid", |b| {
        let g = large_maze();
        b.iter(|| pathing::solve(&g, None, None, SolveAlgorithm::DepthFirst))
    });
}

fn bench_is_perfect(c: &mut Criterion) {
    c.bench_function("is_perfect", |b| {
        let g = large_maze();
        b.iter(|| g.is_perfect())
    });
}

criterion_group!(benches, bench_depth_first_path, bench_solution_grid, bench_is_perfect);
criterion_main!(benches);
