use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wifiplan_backbone::check::verify_tree;
use wifiplan_backbone::{BackboneBuilder, backbone_length};
use wifiplan_common::geom::coord::Coord;
use wifiplan_common::{Grid, Instance};

fn random_routers(rng: &mut StdRng, height: u32, width: u32, count: usize) -> Vec<Coord> {
    (0..count)
        .map(|_| Coord::new(rng.gen_range(0..height), rng.gen_range(0..width)))
        .collect()
}

#[test]
fn random_backbones_are_valid_trees() {
    let mut rng = StdRng::seed_from_u64(7);
    let (height, width) = (24, 31);
    let mut builder = BackboneBuilder::new(height, width, 1);

    for _ in 0..40 {
        let origin = Coord::new(rng.gen_range(0..height), rng.gen_range(0..width));
        let count = rng.gen_range(0..12);
        let routers = random_routers(&mut rng, height, width, count);
        let backbone = builder.build(origin, &routers);

        verify_tree(&backbone, &routers).unwrap();

        let farthest = routers.iter().map(|&r| origin.chebyshev(r)).max().unwrap_or(0);
        let star: u32 = routers.iter().map(|&r| origin.chebyshev(r)).sum();
        assert!(backbone.len() >= farthest as usize);
        assert!(backbone.len() <= star as usize);
    }
}

#[test]
fn router_order_does_not_change_the_result() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut builder = BackboneBuilder::new(20, 20, 1);
    let origin = Coord::new(10, 3);
    let mut routers = random_routers(&mut rng, 20, 20, 8);

    let first = builder.build(origin, &routers);
    routers.reverse();
    let second = builder.build(origin, &routers);
    assert_eq!(first, second);
}

#[test]
fn instance_helpers_use_the_origin() {
    let rows = vec!["......"; 4];
    let grid = Grid::from_rows(&rows).unwrap();
    let instance = Instance::new(grid, 1, 100, 2, 1000, Coord::new(3, 0)).unwrap();

    assert_eq!(backbone_length(&instance, &[Coord::new(3, 0)]), 0);
    assert_eq!(backbone_length(&instance, &[Coord::new(0, 5)]), 5);
    assert_eq!(backbone_length(&instance, &[]), 0);
}

#[test]
fn walls_do_not_block_cable() {
    let rows = ["..#..", "..#..", "..#.."];
    let grid = Grid::from_rows(&rows).unwrap();
    let instance = Instance::new(grid, 1, 1, 1, 100, Coord::new(1, 0)).unwrap();
    assert_eq!(backbone_length(&instance, &[Coord::new(1, 4)]), 4);
}
