use super::*;

fn solid(w: u32, h: u32, px: Rgba8) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba(px))
}

#[test]
fn mask_blend_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(mask_blend(dst, [255, 255, 255, 0]), dst);
}

#[test]
fn mask_blend_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(mask_blend(dst, src), src);
}

#[test]
fn mask_blend_half_alpha_mixes_all_channels() {
    let out = mask_blend([0, 0, 0, 255], [255, 255, 255, 128]);
    // 255*128/255 rounds to 128 on colour; alpha mixes 128*128 + 255*127.
    assert_eq!(out[0], 128);
    assert_eq!(out[3], ((128u32 * 128 + 255 * 127 + 127) / 255) as u8);
}

#[test]
fn placement_reference_scenario() {
    let p = compute_placement((800, 1000), (400, 600), PlacementParams::default());
    assert_eq!(
        p,
        Placement {
            x: 200,
            y: 333,
            width: 400,
            height: 600,
        }
    );
}

#[test]
fn placement_matches_floor_formula() {
    for &(pw, ph, dw, dh) in &[
        (800u32, 1000u32, 400u32, 600u32),
        (801, 999, 333, 517),
        (37, 91, 640, 480),
        (1024, 768, 7, 3000),
        (3, 3, 1, 1),
    ] {
        let p = compute_placement((pw, ph), (dw, dh), PlacementParams::default());
        let tw = pw / 2;
        assert_eq!(p.width, tw);
        let expected_h = (f64::from(dh) * f64::from(tw) / f64::from(dw)).floor() as i64;
        assert!((i64::from(p.height) - expected_h).abs() <= 1);
        assert_eq!(p.x, i64::from(pw / 2) - i64::from(tw / 2));
        assert_eq!(p.y, i64::from(ph / 3));
    }
}

#[test]
fn placement_params_are_overridable_and_validated() {
    let params = PlacementParams::new(0.25, 4).unwrap();
    let p = compute_placement((800, 1000), (400, 600), params);
    assert_eq!((p.x, p.y, p.width, p.height), (300, 250, 200, 300));

    assert!(PlacementParams::new(0.0, 3).is_err());
    assert!(PlacementParams::new(f64::NAN, 3).is_err());
    assert!(PlacementParams::new(0.5, 0).is_err());
}

#[test]
fn composite_reference_scenario_places_opaque_block() {
    let person = PersonImage::from_rgba(solid(800, 1000, [0, 0, 255, 255]));
    let product = ProductImage::from_rgba(solid(400, 600, [255, 0, 0, 255]));

    let out = composite(&person, &product, PlacementParams::default());
    assert_eq!(out.image.dimensions(), (800, 1000));
    assert_eq!(out.placement.x, 200);
    assert_eq!(out.placement.y, 333);

    assert_eq!(out.image.get_pixel(199, 500).0, [0, 0, 255, 255]);
    assert_eq!(out.image.get_pixel(400, 332).0, [0, 0, 255, 255]);
    assert_eq!(out.image.get_pixel(400, 600).0, [255, 0, 0, 255]);
    assert_eq!(out.image.get_pixel(600, 999).0, [0, 0, 255, 255]);
    // input is not mutated
    assert_eq!(person.as_rgba().get_pixel(400, 600).0, [0, 0, 255, 255]);
}

#[test]
fn transparent_product_pixels_leave_person_untouched() {
    let mut person_px = RgbaImage::new(40, 60);
    for (x, y, p) in person_px.enumerate_pixels_mut() {
        *p = image::Rgba([(x * 6) as u8, (y * 4) as u8, 77, 255]);
    }
    let person = PersonImage::from_rgba(person_px);
    let product = ProductImage::from_rgba(solid(10, 10, [255, 255, 255, 0]));

    let out = composite(&person, &product, PlacementParams::default());
    assert_eq!(&out.image, person.as_rgba());
}

#[test]
fn composite_is_deterministic() {
    let mut person_px = RgbaImage::new(64, 48);
    for (x, y, p) in person_px.enumerate_pixels_mut() {
        *p = image::Rgba([(x * 3) as u8, (y * 5) as u8, ((x + y) * 2) as u8, 255]);
    }
    let mut product_px = RgbaImage::new(17, 23);
    for (x, y, p) in product_px.enumerate_pixels_mut() {
        *p = image::Rgba([200, (x * 11) as u8, (y * 7) as u8, ((x * y) % 256) as u8]);
    }
    let person = PersonImage::from_rgba(person_px);
    let product = ProductImage::from_rgba(product_px);

    let a = composite(&person, &product, PlacementParams::default());
    let b = composite(&person, &product, PlacementParams::default());
    assert_eq!(a.image.as_raw(), b.image.as_raw());
    assert_eq!(a.placement, b.placement);
}

#[test]
fn oversize_product_is_clipped_to_canvas() {
    let person = PersonImage::from_rgba(solid(100, 90, [0, 0, 0, 255]));
    let product = ProductImage::from_rgba(solid(50, 2000, [9, 9, 9, 255]));

    let out = composite(&person, &product, PlacementParams::default());
    assert_eq!(out.image.dimensions(), (100, 90));
    assert_eq!(out.placement.height, 2000);
    assert_eq!(out.image.get_pixel(50, 89).0, [9, 9, 9, 255]);
    assert_eq!(out.image.get_pixel(50, 29).0, [0, 0, 0, 255]);
}

#[test]
fn wide_fraction_clips_left_edge_silently() {
    let person = PersonImage::from_rgba(solid(10, 10, [0, 0, 0, 255]));
    let product = ProductImage::from_rgba(solid(4, 4, [255, 255, 255, 255]));
    let params = PlacementParams::new(3.0, 3).unwrap();

    let out = composite(&person, &product, params);
    assert_eq!(out.placement.x, -10);
    assert_eq!(out.image.dimensions(), (10, 10));
}

#[test]
fn one_pixel_person_scales_product_to_nothing() {
    let person = PersonImage::from_rgba(solid(1, 1, [1, 2, 3, 255]));
    let product = ProductImage::from_rgba(solid(5, 5, [255, 255, 255, 255]));

    let out = composite(&person, &product, PlacementParams::default());
    assert_eq!(out.placement.width, 0);
    assert_eq!(out.image.get_pixel(0, 0).0, [1, 2, 3, 255]);
}

#[test]
fn paste_outside_canvas_is_noop() {
    let mut dst = solid(4, 4, [1, 1, 1, 255]);
    let before = dst.clone();
    paste_masked(&mut dst, &solid(2, 2, [9, 9, 9, 255]), 10, 10);
    paste_masked(&mut dst, &solid(2, 2, [9, 9, 9, 255]), -5, 0);
    assert_eq!(dst, before);
}

#[test]
fn thin_person_image_only_resamples_the_visible_band() {
    let person = PersonImage::from_rgba(solid(200_000, 1, [0, 0, 255, 255]));
    let product = ProductImage::from_rgba(solid(400, 600, [255, 0, 0, 255]));

    let out = composite(&person, &product, PlacementParams::default());
    assert_eq!(
        out.placement,
        Placement {
            x: 50_000,
            y: 0,
            width: 100_000,
            height: 150_000,
        }
    );
    assert_eq!(out.image.dimensions(), (200_000, 1));
    assert_eq!(out.image.get_pixel(49_999, 0).0, [0, 0, 255, 255]);
    assert_eq!(out.image.get_pixel(100_000, 0).0, [255, 0, 0, 255]);
    assert_eq!(out.image.get_pixel(150_000, 0).0, [0, 0, 255, 255]);
}

#[test]
fn wider_product_keeps_person_canvas() {
    let person = PersonImage::from_rgba(solid(37, 91, [0, 0, 0, 255]));
    let product = ProductImage::from_rgba(solid(640, 480, [250, 250, 250, 255]));

    let out = composite(&person, &product, PlacementParams::default());
    assert_eq!(out.image.dimensions(), (37, 91));
    assert_eq!(
        (out.placement.x, out.placement.y, out.placement.width, out.placement.height),
        (9, 30, 18, 13)
    );
    assert_eq!(out.image.get_pixel(18, 36).0, [250, 250, 250, 255]);
    assert_eq!(out.image.get_pixel(18, 29).0, [0, 0, 0, 255]);
    assert_eq!(out.image.get_pixel(8, 36).0, [0, 0, 0, 255]);
}

#[test]
fn visible_window_clips_each_axis() {
    let p = Placement {
        x: -3,
        y: 5,
        width: 10,
        height: 10,
    };
    assert_eq!(visible_window(p, (20, 8)), Some((3..10, 0..3)));
    assert_eq!(visible_window(p, (20, 5)), None);

    let off = Placement {
        x: 30,
        y: 0,
        width: 4,
        height: 4,
    };
    assert_eq!(visible_window(off, (20, 20)), None);
}
