use super::*;

#[test]
fn cell_address_follows_column_per_target() {
    for target in Target::ALL {
        for idx in 0..8 {
            let c = target.index() as i32;
            assert_eq!(
                cell_address(target, idx, false),
                CellAddr::new(2 + 2 * c, 16 - 2 * idx as i32)
            );
            assert_eq!(
                cell_address(target, idx, true),
                CellAddr::new(2 + 2 * c, 16 - 2 * idx as i32)
            );
        }
    }
}

#[test]
fn last_page_shi_overflow_moves_to_column_six() {
    assert_eq!(cell_address(Target::Shi, 7, true), CellAddr::new(4, 2));
    assert_eq!(cell_address(Target::Shi, 8, true), CellAddr::new(6, 6));
    assert_eq!(cell_address(Target::Shi, 9, true), CellAddr::new(6, 4));
    assert_eq!(cell_address(Target::Shi, 10, true), CellAddr::new(6, 2));
}

#[test]
fn overflow_only_applies_to_shi_on_the_last_page() {
    assert_eq!(cell_address(Target::Shi, 8, false), CellAddr::new(4, 0));
    assert_eq!(cell_address(Target::Wo, 8, true), CellAddr::new(2, 0));
    assert_eq!(cell_address(Target::Hen, 9, true), CellAddr::new(6, -2));
}

#[test]
fn geometry_from_a4_like_page() {
    let g = GridGeometry::new(607.5, 810.0, VERTICAL_CELLS, PADDING_FRACTION).unwrap();
    assert_eq!(g.cell_size, 45.0);
    assert!((g.padding - 4.5).abs() < 1e-12);
    assert_eq!(g.horizontal_cells(), 13.5);
}

#[test]
fn crop_rect_is_cell_plus_padding() {
    let g = GridGeometry::new(100.0, 180.0, 18, 0.1).unwrap();
    assert_eq!(g.cell_size, 10.0);
    assert_eq!(g.padding, 1.0);

    let r = g.crop_rect(CellAddr::new(2, 16));
    assert_eq!(r, Rect::new(19.0, 159.0, 31.0, 171.0));

    let r = g.crop_rect(CellAddr::new(0, 0));
    assert_eq!(r, Rect::new(-1.0, -1.0, 11.0, 11.0));
}

#[test]
fn from_media_box_uses_upper_right_corner() {
    let g = GridGeometry::from_media_box(Rect::new(0.0, 0.0, 90.0, 180.0), 18, 0.1).unwrap();
    assert_eq!(g.page_width, 90.0);
    assert_eq!(g.page_height, 180.0);
    assert_eq!(g.horizontal_cells(), 9.0);
}

#[test]
fn degenerate_geometry_is_rejected() {
    assert!(GridGeometry::new(0.0, 100.0, 18, 0.1).is_err());
    assert!(GridGeometry::new(100.0, 0.0, 18, 0.1).is_err());
    assert!(GridGeometry::new(100.0, 100.0, 0, 0.1).is_err());
}
