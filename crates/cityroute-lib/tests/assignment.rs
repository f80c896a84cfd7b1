use std::collections::HashSet;
use std::sync::Arc;

use cityroute_lib::{
    dispatch_units, solve_assignment, total_cost, CostMatrix, Graph, Position, RoadType,
    RouteStrategy, Router, RouterConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> CostMatrix {
    // Integral costs keep reductions exact.
    CostMatrix::from_fn(rows, cols, |_, _| f64::from(rng.gen_range(0..50u32))).unwrap()
}

fn permutations(n: usize) -> Vec<Vec<usize>> {
    if n == 0 {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for perm in permutations(n - 1) {
        for slot in 0..=perm.len() {
            let mut next = perm.clone();
            next.insert(slot, n - 1);
            out.push(next);
        }
    }
    out
}

fn brute_force_minimum(costs: &CostMatrix) -> f64 {
    permutations(costs.rows())
        .into_iter()
        .map(|perm| {
            perm.iter()
                .enumerate()
                .map(|(row, &col)| costs.get(row, col).unwrap())
                .sum::<f64>()
        })
        .fold(f64::INFINITY, f64::min)
}

#[test]
fn documented_matrix_assigns_diagonal() {
    let costs = CostMatrix::from_rows(vec![
        vec![2.5, 4.0, 6.5],
        vec![3.0, 1.5, 5.0],
        vec![5.5, 3.5, 2.0],
    ])
    .unwrap();
    let assignments = solve_assignment(&costs, &[1, 2, 3], &[1, 2, 3]).unwrap();

    assert_eq!(assignments.len(), 3);
    for assignment in &assignments {
        assert_eq!(assignment.agent, assignment.task);
    }
    assert_eq!(total_cost(&assignments), 6.0);
}

#[test]
fn square_solutions_are_optimal_bijections() {
    let mut rng = StdRng::seed_from_u64(42);
    for n in 1..=6 {
        for _ in 0..10 {
            let costs = random_matrix(&mut rng, n, n);
            let ids: Vec<usize> = (0..n).collect();
            let assignments = solve_assignment(&costs, &ids, &ids).unwrap();

            assert_eq!(assignments.len(), n);
            let agents: HashSet<usize> = assignments.iter().map(|a| a.agent).collect();
            let tasks: HashSet<usize> = assignments.iter().map(|a| a.task).collect();
            assert_eq!(agents.len(), n);
            assert_eq!(tasks.len(), n);

            let total = total_cost(&assignments);
            let diagonal: f64 = (0..n).map(|i| costs.get(i, i).unwrap()).sum();
            assert!(total <= diagonal);
            assert_eq!(total, brute_force_minimum(&costs));
        }
    }
}

#[test]
fn rectangular_solutions_skip_padding() {
    let mut rng = StdRng::seed_from_u64(7);
    for (rows, cols) in [(2, 5), (5, 2), (1, 4), (4, 1), (3, 4)] {
        let costs = random_matrix(&mut rng, rows, cols);
        let agents: Vec<usize> = (0..rows).collect();
        let tasks: Vec<usize> = (100..100 + cols).collect();
        let assignments = solve_assignment(&costs, &agents, &tasks).unwrap();

        assert_eq!(assignments.len(), rows.min(cols));
        for assignment in &assignments {
            assert!(assignment.cost <= costs.max());
            assert_eq!(
                costs.get(assignment.agent, assignment.task - 100),
                Some(assignment.cost)
            );
        }
    }
}

#[test]
fn dispatch_uses_live_routing_costs() {
    let mut builder = Graph::builder();
    for id in 0..5 {
        builder
            .add_node(id, Position::new(id as f64 * 2.0, 0.0))
            .unwrap();
    }
    for id in 1..5 {
        builder
            .add_edge(id - 1, id, 2.0, RoadType::Arterial)
            .unwrap();
    }
    let router = Router::new(Arc::new(builder.build()), RouterConfig::default()).unwrap();

    let units = [("ambulance", 0), ("patrol", 4)];
    let tasks = [("collision", 1), ("burglary", 3), ("alarm", 2)];
    let assignments = dispatch_units(&router, &units, &tasks, RouteStrategy::Shortest).unwrap();

    assert_eq!(assignments.len(), 2);
    assert_eq!(total_cost(&assignments), 4.0);
    assert!(assignments
        .iter()
        .any(|a| a.agent == "ambulance" && a.task == "collision"));
    assert!(assignments
        .iter()
        .any(|a| a.agent == "patrol" && a.task == "burglary"));
}
