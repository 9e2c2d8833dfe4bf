use super::*;
use ecfp_digits::{from_be_bytes, from_biguint, to_biguint};
use hex_literal::hex;
use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

type Affine = Option<(BigUint, BigUint)>;

/// Textbook affine arithmetic, used as an oracle for the Jacobian formulas.
struct Reference {
    p: BigUint,
    a: BigUint,
}

impl Reference {
    fn new(curve: &CurveDescriptor) -> Self {
        Self {
            p: to_biguint(curve.p()),
            a: to_biguint(curve.a()),
        }
    }

    fn sub(&self, x: &BigUint, y: &BigUint) -> BigUint {
        (x + &self.p - y) % &self.p
    }

    fn inv(&self, x: &BigUint) -> BigUint {
        x.modpow(&(&self.p - 2u32), &self.p)
    }

    fn add(&self, lhs: &Affine, rhs: &Affine) -> Affine {
        let Some((x1, y1)) = lhs else {
            return rhs.clone();
        };
        let Some((x2, y2)) = rhs else {
            return lhs.clone();
        };
        let p = &self.p;
        let lambda = if x1 == x2 {
            if (y1 + y2) % p == BigUint::from(0u32) {
                return None;
            }
            (BigUint::from(3u32) * x1 * x1 + &self.a) * self.inv(&(y1 * 2u32 % p)) % p
        } else {
            self.sub(y2, y1) * self.inv(&self.sub(x2, x1)) % p
        };
        let x3 = self.sub(&self.sub(&(&lambda * &lambda % p), x1), x2);
        let y3 = self.sub(&(&lambda * self.sub(x1, &x3) % p), y1);
        Some((x3, y3))
    }

    fn mul(&self, k: &BigUint, point: &Affine) -> Affine {
        let mut result = None;
        for i in (0..k.bits()).rev() {
            result = self.add(&result, &result);
            if k.bit(i) {
                result = self.add(&result, point);
            }
        }
        result
    }

    fn of(point: &CurvePoint) -> Affine {
        assert!(point.is_affine());
        assert_eq!(point.domain(), Domain::Standard);
        (!point.is_infinity()).then(|| (to_biguint(point.x()), to_biguint(point.y())))
    }
}

fn setup(named: NamedCurve) -> (Arc<CurveDescriptor>, CurveOperator, Reference) {
    let curve = named.descriptor().unwrap();
    let operator = CurveOperator::new(&curve).unwrap();
    let reference = Reference::new(&curve);
    (curve, operator, reference)
}

fn to_standard_affine(operator: &mut CurveOperator, point: &CurvePoint) -> CurvePoint {
    let mut point = point.clone();
    if !point.is_affine() {
        operator.convert_to_affine_form(&mut point).unwrap();
    }
    if point.domain() == Domain::Montgomery {
        operator.convert_to_standard_form(&mut point).unwrap();
    }
    point
}

fn to_montgomery_affine(operator: &CurveOperator, point: &CurvePoint) -> CurvePoint {
    let mut point = point.clone();
    operator.convert_to_montgomery_form(&mut point).unwrap();
    point
}

fn to_montgomery_jacobian(operator: &CurveOperator, point: &CurvePoint) -> CurvePoint {
    let mut point = to_montgomery_affine(operator, point);
    operator.convert_to_jacobian_form(&mut point).unwrap();
    point
}

fn point_from(curve: &Arc<CurveDescriptor>, affine: &Affine) -> CurvePoint {
    match affine {
        None => curve.create_point_at_infinity(),
        Some((x, y)) => CurvePoint::new_affine(
            curve,
            from_biguint(x, curve.width()).unwrap(),
            from_biguint(y, curve.width()).unwrap(),
        )
        .unwrap(),
    }
}

fn multiple(curve: &Arc<CurveDescriptor>, reference: &Reference, k: u64) -> CurvePoint {
    let g = Reference::of(&curve.generator());
    point_from(curve, &reference.mul(&BigUint::from(k), &g))
}

#[test]
fn test_double_matches_reference() {
    for named in NamedCurve::ALL {
        let (curve, mut operator, reference) = setup(named);
        let g = curve.generator();
        let jacobian = to_montgomery_jacobian(&operator, &g);

        let mut doubled = curve.allocate_point_storage();
        operator.double(&jacobian, &mut doubled).unwrap();
        let expected = reference.add(&Reference::of(&g), &Reference::of(&g));
        assert_eq!(Reference::of(&to_standard_affine(&mut operator, &doubled)), expected);

        // Z != 1: double again in place and compare with 4G.
        operator.double_assign(&mut doubled).unwrap();
        assert_eq!(
            to_standard_affine(&mut operator, &doubled),
            multiple(&curve, &reference, 4),
            "{named}"
        );
    }
}

#[test]
fn test_double_random_points_matches_reference() {
    let mut rng = StdRng::seed_from_u64(7);
    for named in NamedCurve::ALL {
        let (curve, mut operator, reference) = setup(named);
        let g_montgomery = to_montgomery_affine(&operator, &curve.generator());
        for _ in 0..8 {
            // The scalar-multiplication output is Jacobian with Z != 1.
            let k = curve.random_scalar(&mut rng);
            let mut point = operator.jacobian_infinity();
            operator.scalar_multiply(&k, &g_montgomery, &mut point).unwrap();
            let affine = Reference::of(&to_standard_affine(&mut operator, &point));

            let mut doubled = curve.allocate_point_storage();
            operator.double(&point, &mut doubled).unwrap();
            assert_eq!(
                Reference::of(&to_standard_affine(&mut operator, &doubled)),
                reference.add(&affine, &affine),
                "{named}"
            );
        }
    }
}

#[test]
fn test_double_infinity() {
    let (_, mut operator, _) = setup(NamedCurve::P256);
    let infinity = operator.jacobian_infinity();
    let mut out = infinity.clone();
    operator.double(&infinity, &mut out).unwrap();
    assert!(out.is_infinity());
}

#[test]
fn test_known_p256_multiples() {
    let curve = CurveDescriptor::p256().unwrap();
    let mut group = EcGroup::new(&curve).unwrap();
    let g = group.generator();

    let vectors: [(u64, [u8; 32], [u8; 32]); 3] = [
        (
            2,
            hex!("7cf27b188d034f7e8a52380304b51ac3c08969e277f21b35a60b48fc47669978"),
            hex!("07775510db8ed040293d9ac69f7430dbba7dade63ce982299e04b79d227873d1"),
        ),
        (
            3,
            hex!("5ecbe4d1a6330a44c8f7ef951d4bf165e6c6b721efada985fb41661bc6e7fd6c"),
            hex!("8734640c4998ff7e374b06ce1a64a2ecd82ab036384fb83d9a79b127a27d5032"),
        ),
        (
            112233445566778899,
            hex!("339150844ec15234807fe862a86be77977dbfb3ae3d96f4c22795513aeaab82f"),
            hex!("b1c14ddfdc8ec1b2583f51e85a5eb3a155840f2034730e9b5ada38b674336a21"),
        ),
    ];
    for (k, x, y) in vectors {
        let product = group.scalar_mul(&g, &[k, 0, 0, 0]).unwrap();
        assert_eq!(product.x(), from_be_bytes(&x, 4).unwrap());
        assert_eq!(product.y(), from_be_bytes(&y, 4).unwrap());
    }
}

#[test]
fn test_known_bn254_double() {
    let curve = CurveDescriptor::bn254().unwrap();
    let mut group = EcGroup::new(&curve).unwrap();
    let doubled = group.scalar_mul(&group.generator(), &[2, 0, 0, 0]).unwrap();
    assert_eq!(
        doubled.encode().unwrap(),
        hex!(
            "04"
            "0948d920900000006e8d1360000000021848400000000004e9c0000000000009"
            "17361ed1680000011460b070000000053cb4a0000000000c4860000000000003"
        )
    );
}

#[test]
fn test_mixed_add_cases() {
    for named in NamedCurve::ALL {
        let (curve, mut operator, reference) = setup(named);
        let g = curve.generator();
        let three_g = multiple(&curve, &reference, 3);
        let jacobian = to_montgomery_jacobian(&operator, &g);
        let mut out = curve.allocate_point_storage();

        // Distinct operands.
        operator
            .mixed_add(&jacobian, &to_montgomery_affine(&operator, &three_g), &mut out)
            .unwrap();
        assert_eq!(to_standard_affine(&mut operator, &out), multiple(&curve, &reference, 4));

        // Equal operands fall back to doubling.
        operator
            .mixed_add(&jacobian, &to_montgomery_affine(&operator, &g), &mut out)
            .unwrap();
        assert_eq!(to_standard_affine(&mut operator, &out), multiple(&curve, &reference, 2));

        // Opposite operands cancel.
        let mut neg_g = curve.allocate_point_storage();
        operator.negate(&g, &mut neg_g).unwrap();
        operator
            .mixed_add(&jacobian, &to_montgomery_affine(&operator, &neg_g), &mut out)
            .unwrap();
        assert!(out.is_infinity(), "{named}");

        // Identity on either side.
        let g_montgomery = to_montgomery_affine(&operator, &g);
        operator
            .mixed_add(&operator.jacobian_infinity(), &g_montgomery, &mut out)
            .unwrap();
        assert_eq!(out, jacobian);
        let mut infinity = curve.create_point_at_infinity();
        operator.convert_to_montgomery_form(&mut infinity).unwrap();
        operator.mixed_add(&jacobian, &infinity, &mut out).unwrap();
        assert_eq!(out, jacobian);
    }
}

#[test]
fn test_mixed_add_with_non_unit_z() {
    let (curve, mut operator, reference) = setup(NamedCurve::P384);
    let g = curve.generator();
    let g_montgomery = to_montgomery_affine(&operator, &g);
    let mut acc = to_montgomery_jacobian(&operator, &g);
    for k in 2..=9 {
        operator.mixed_add_assign(&mut acc, &g_montgomery).unwrap();
        assert_eq!(to_standard_affine(&mut operator, &acc), multiple(&curve, &reference, k));
    }
}

#[test]
fn test_mixed_double_add_cases() {
    for named in NamedCurve::ALL {
        let (curve, mut operator, reference) = setup(named);
        let g = curve.generator();
        let g_montgomery = to_montgomery_affine(&operator, &g);
        let five_g = to_montgomery_affine(&operator, &multiple(&curve, &reference, 5));

        // 2 * 3G + 5G = 11G, with Z != 1 on the accumulator.
        let mut acc = to_montgomery_jacobian(&operator, &g);
        let two_g = to_montgomery_affine(&operator, &multiple(&curve, &reference, 2));
        operator.mixed_add_assign(&mut acc, &two_g).unwrap();
        let mut out = curve.allocate_point_storage();
        operator.mixed_double_add(&acc, &five_g, &mut out).unwrap();
        assert_eq!(
            to_standard_affine(&mut operator, &out),
            multiple(&curve, &reference, 11),
            "{named}"
        );

        // Infinity addend doubles; infinity accumulator takes the addend.
        let mut infinity = curve.create_point_at_infinity();
        operator.convert_to_montgomery_form(&mut infinity).unwrap();
        operator.mixed_double_add(&acc, &infinity, &mut out).unwrap();
        assert_eq!(to_standard_affine(&mut operator, &out), multiple(&curve, &reference, 6));
        operator
            .mixed_double_add(&operator.jacobian_infinity(), &five_g, &mut out)
            .unwrap();
        assert_eq!(to_standard_affine(&mut operator, &out), multiple(&curve, &reference, 5));

        // 2G + (-2G) is the point at infinity.
        let jacobian = to_montgomery_jacobian(&operator, &g);
        let mut neg_two_g = curve.allocate_point_storage();
        operator.negate(&multiple(&curve, &reference, 2), &mut neg_two_g).unwrap();
        operator
            .mixed_double_add(&jacobian, &to_montgomery_affine(&operator, &neg_two_g), &mut out)
            .unwrap();
        assert!(out.is_infinity());

        // The formula cannot handle an addend equal to the accumulator.
        assert!(matches!(
            operator.mixed_double_add(&jacobian, &g_montgomery, &mut out),
            Err(CurveError::Internal(_))
        ));
    }
}

#[test]
fn test_precomputation_table_holds_odd_multiples() {
    for named in [NamedCurve::P256, NamedCurve::P521, NamedCurve::Bn254] {
        let (curve, mut operator, reference) = setup(named);
        let point = multiple(&curve, &reference, 7);
        let point_montgomery = to_montgomery_affine(&operator, &point);
        for w in [4, 5, 6] {
            let table = operator
                .generate_precomputation_table(w, &point_montgomery)
                .unwrap();
            assert_eq!(table.len(), 1 << (w - 2));
            let p = Reference::of(&point);
            for (i, entry) in table.iter().enumerate() {
                assert!(entry.is_affine());
                assert_eq!(entry.domain(), Domain::Montgomery);
                let expected = reference.mul(&BigUint::from(2 * i as u64 + 1), &p);
                assert_eq!(
                    Reference::of(&to_standard_affine(&mut operator, entry)),
                    expected,
                    "{named} w = {w} entry {i}"
                );
            }
        }
    }
}

#[test]
fn test_precomputation_table_preconditions() {
    let (curve, mut operator, _) = setup(NamedCurve::P256);
    let g = curve.generator();
    let g_montgomery = to_montgomery_affine(&operator, &g);
    assert_eq!(
        operator.generate_precomputation_table(3, &g_montgomery),
        Err(CurveError::WindowTooSmall(3))
    );
    assert!(matches!(
        operator.generate_precomputation_table(5, &g),
        Err(CurveError::WrongDomain { .. })
    ));
    let mut infinity = curve.create_point_at_infinity();
    operator.convert_to_montgomery_form(&mut infinity).unwrap();
    assert_eq!(
        operator.generate_precomputation_table(5, &infinity),
        Err(CurveError::InfinityNotAllowed("generate_precomputation_table"))
    );
}

#[test]
fn test_scalar_multiply_matches_reference() {
    let mut rng = StdRng::seed_from_u64(42);
    for named in NamedCurve::ALL {
        let (curve, mut operator, reference) = setup(named);
        let g = curve.generator();
        let g_montgomery = to_montgomery_affine(&operator, &g);
        for _ in 0..4 {
            let k = curve.random_scalar(&mut rng);
            let mut out = curve.allocate_point_storage();
            operator.scalar_multiply(&k, &g_montgomery, &mut out).unwrap();
            assert!(!out.is_affine());
            assert_eq!(out.domain(), Domain::Montgomery);
            let expected = reference.mul(&to_biguint(&k), &Reference::of(&g));
            assert_eq!(
                Reference::of(&to_standard_affine(&mut operator, &out)),
                expected,
                "{named}"
            );
        }
    }
}

#[test]
fn test_scalar_multiply_edge_cases() {
    for named in NamedCurve::ALL {
        let (curve, mut operator, _) = setup(named);
        let width = curve.width();
        let g = curve.generator();
        let g_montgomery = to_montgomery_affine(&operator, &g);
        let mut out = curve.allocate_point_storage();

        operator.scalar_multiply(&vec![0; width], &g_montgomery, &mut out).unwrap();
        assert!(out.is_infinity());

        let one = ecfp_digits::from_u64(1, width);
        operator.scalar_multiply(&one, &g_montgomery, &mut out).unwrap();
        assert_eq!(to_standard_affine(&mut operator, &out), g);

        let mut n_minus_one = curve.order().to_vec();
        ecfp_digits::sub_assign(&mut n_minus_one, &one);
        operator
            .scalar_multiply(&n_minus_one, &g_montgomery, &mut out)
            .unwrap();
        let mut neg_g = curve.allocate_point_storage();
        operator.negate(&g, &mut neg_g).unwrap();
        assert_eq!(to_standard_affine(&mut operator, &out), neg_g, "{named}");

        assert_eq!(
            operator.scalar_multiply(curve.order(), &g_montgomery, &mut out),
            Err(CurveError::ScalarOutOfRange)
        );

        let mut infinity = curve.create_point_at_infinity();
        operator.convert_to_montgomery_form(&mut infinity).unwrap();
        operator.scalar_multiply(&one, &infinity, &mut out).unwrap();
        assert!(out.is_infinity());
        operator.scalar_multiply(curve.order(), &infinity, &mut out).unwrap();
        assert!(out.is_infinity());
    }
}

#[test]
fn test_precondition_failures_leave_operands_untouched() {
    let (curve, mut operator, _) = setup(NamedCurve::P256);
    let g = curve.generator();
    let mut out = to_montgomery_jacobian(&operator, &g);
    let before = out.clone();

    assert!(matches!(
        operator.double(&g, &mut out),
        Err(CurveError::WrongCoordinates { .. })
    ));
    assert!(matches!(
        operator.mixed_add_assign(&mut out, &g),
        Err(CurveError::WrongDomain { .. })
    ));
    assert!(matches!(
        operator.mixed_double_add_assign(&mut out, &before),
        Err(CurveError::WrongCoordinates { .. })
    ));
    assert_eq!(out, before);

    let other = CurveDescriptor::bn254().unwrap();
    let foreign = to_montgomery_affine(&CurveOperator::new(&other).unwrap(), &other.generator());
    assert_eq!(
        operator.mixed_add_assign(&mut out, &foreign),
        Err(CurveError::CurveMismatch)
    );
    assert_eq!(out, before);
}

#[test]
fn test_scalar_multiply_failures_leave_output_untouched() {
    let (curve, mut operator, reference) = setup(NamedCurve::P256);
    let g = curve.generator();
    let g_montgomery = to_montgomery_affine(&operator, &g);
    let mut out = to_montgomery_jacobian(&operator, &multiple(&curve, &reference, 3));
    let before = out.clone();

    assert_eq!(
        operator.scalar_multiply(curve.order(), &g_montgomery, &mut out),
        Err(CurveError::ScalarOutOfRange)
    );
    assert_eq!(out, before);

    let one = ecfp_digits::from_u64(1, curve.width());
    assert!(matches!(
        operator.scalar_multiply(&one, &g, &mut out),
        Err(CurveError::WrongDomain { .. })
    ));
    assert!(matches!(
        operator.scalar_multiply(&one, &before, &mut out),
        Err(CurveError::WrongCoordinates { .. })
    ));
    assert_eq!(out, before);

    let other = CurveDescriptor::bn254().unwrap();
    assert_eq!(
        operator.scalar_multiply(&one, &other.create_point_at_infinity(), &mut out),
        Err(CurveError::CurveMismatch)
    );
    assert_eq!(out, before);
}

#[test]
fn test_same_curve_by_value() {
    let first = CurveDescriptor::p256().unwrap();
    let second = CurveDescriptor::p256().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));

    let mut operator = CurveOperator::new(&first).unwrap();
    let g = to_montgomery_jacobian(&operator, &second.generator());
    let mut out = first.allocate_point_storage();
    operator.double(&g, &mut out).unwrap();
}
