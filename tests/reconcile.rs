use qubeops::*;

fn samples() -> Vec<Box<dyn Dataset>> {
    vec![
        Box::new(ArrayDataset::scalar(1.0)),
        Box::new(ArrayDataset::rank1(vec![1.0, 2.0, 3.0])),
        Box::new(ArrayDataset::rank1(vec![1.0, 2.0])),
        Box::new(ArrayDataset::zeros([3, 2]).unwrap()),
        Box::new(ArrayDataset::zeros([3, 2, 2]).unwrap()),
        Box::new(JoinDataset::new(vec![
            ArrayDataset::zeros([2]).unwrap().into(),
            ArrayDataset::zeros([2]).unwrap().into(),
            ArrayDataset::zeros([2]).unwrap().into(),
        ]).unwrap()),
        Box::new(JoinDataset::new(vec![
            ArrayDataset::zeros([2]).unwrap().into(),
            ArrayDataset::zeros([1]).unwrap().into(),
            ArrayDataset::zeros([2]).unwrap().into(),
        ]).unwrap()),
    ]
}

#[test]
fn geometry_equal_is_reflexive_and_symmetric() {
    let samples = samples();
    for a in &samples {
        assert!(geometry_equal(a.as_ref(), a.as_ref()));
        for b in &samples {
            assert_eq!(geometry_equal(a.as_ref(), b.as_ref()), geometry_equal(b.as_ref(), a.as_ref()));
        }
    }
    // A qube and a ragged dataset can still share geometry.
    assert!(geometry_equal(samples[3].as_ref(), samples[5].as_ref()));
    assert!(!geometry_equal(samples[3].as_ref(), samples[6].as_ref()));
}

#[test]
fn promoted_scalar_repeats_everywhere() {
    let s = ArrayDataset::scalar(-3.25);
    for x in samples() {
        let r = reconcile(&s, x.as_ref(), false).unwrap();
        each_index(x.as_ref(), |i| {
            assert_eq!(r.first.value(i)?, -3.25);
            Ok(())
        }).unwrap();
    }
}

#[test]
fn promoted_vector_repeats_along_rows() {
    let a = ArrayDataset::rank1(vec![5.0, 6.0, 7.0]);
    let b = ArrayDataset::zeros([3, 4]).unwrap();
    let p = promote_from1(&a, &b).unwrap();
    each_index(&b, |i| {
        assert_eq!(p.value(i)?, a.value(&i[..1])?);
        Ok(())
    }).unwrap();
    // Rank 1 onto rank 3 works the same way.
    let c = ArrayDataset::zeros([3, 2, 2]).unwrap();
    let q = promote_from1(&a, &c).unwrap();
    assert_eq!(q.value(&[2, 1, 1]).unwrap(), 7.0);
}

#[test]
fn promoted_matrix_repeats_along_the_third_axis() {
    let a = ArrayDataset::from_fn([2, 3], |i| (10 * i[0] + i[1]) as f64).unwrap();
    let b = ArrayDataset::zeros([2, 3, 4]).unwrap();
    let p = promote_from2(&a, &b).unwrap();
    assert_eq!(p.rank(), 3);
    assert_eq!(p.qube_dims(), Some(vec![2, 3, 4]));
    each_index(&b, |i| {
        assert_eq!(p.value(i)?, a.value(&i[..2])?);
        Ok(())
    }).unwrap();
}

#[test]
fn promoted_matrix_over_ragged_rank3() {
    let a = ArrayDataset::from_fn([2, 2], |i| (10 * i[0] + i[1]) as f64).unwrap();
    let b = JoinDataset::new(vec![
        ArrayDataset::zeros([2, 3]).unwrap().into(),
        JoinDataset::new(vec![
            ArrayDataset::zeros([1]).unwrap().into(),
            ArrayDataset::zeros([4]).unwrap().into(),
        ]).unwrap().into(),
    ]).unwrap();
    let p = promote_from2(&a, &b).unwrap();
    assert_eq!(p.qube_dims(), None);
    assert_eq!(p.length(&[1, 1]).unwrap(), 4);
    assert_eq!(p.value(&[1, 1, 3]).unwrap(), 11.0);

    let r = reconcile(&b, &a, false).unwrap();
    assert!(r.second.is_promoted());
    assert_eq!(r.second.source().rank(), 2);
    assert_eq!(r.first.source().rank(), 3);
    let mut n = 0;
    each_index(&r.first, |i| {
        assert_eq!(r.second.value(i)?, a.value(&i[..2])?);
        n += 1;
        Ok(())
    }).unwrap();
    assert_eq!(n, 3 + 3 + 1 + 4);
    // Neither side is rectangular, so there is no buffer to write a result into.
    assert_eq!(reconcile(&b, &a, true).err(), Some(Error::NoQubeOperand));
}

#[test]
fn promoted_view_takes_qube_from_the_donor() {
    let a = ArrayDataset::rank1(vec![1.0, 2.0]).with_property(Key::Label, "a");
    let b = JoinDataset::new(vec![
        ArrayDataset::zeros([2]).unwrap().with_property(Key::Label, "row").into(),
        ArrayDataset::zeros([3]).unwrap().into(),
    ]).unwrap();
    let p = promote_from1(&a, &b).unwrap();
    assert_eq!(p.property(Key::Qube), None);
    assert_eq!(p.property(Key::Label), Some(Value::from("a")));
    assert_eq!(p.property_at(Key::Label, 0), Some(Value::from("a")));
    assert_eq!(p.length(&[1]).unwrap(), 3);

    let q = promote_from0(ArrayDataset::scalar(1.0), ArrayDataset::zeros([2, 2]).unwrap()).unwrap();
    assert_eq!(q.property(Key::Qube), Some(Value::Bool(true)));
}

#[test]
fn promotion_constructors_check_rank() {
    let v = ArrayDataset::rank1(vec![1.0]);
    let m = ArrayDataset::zeros([1, 1]).unwrap();
    assert_eq!(promote_from0(&v, &m).err(), Some(Error::RankMismatch {from: 1, onto: 0}));
    assert_eq!(promote_from1(&m, &v).err(), Some(Error::RankMismatch {from: 2, onto: 1}));
    assert_eq!(promote_from2(&m, &m).err(), Some(Error::RankMismatch {from: 2, onto: 2}));
}

#[test]
fn result_prefers_the_first_qube() {
    let a = ArrayDataset::zeros([2, 3]).unwrap();
    let b = ArrayDataset::rank1(vec![1.0, 2.0]);
    let r = reconcile(&b, &a, true).unwrap();
    assert!(r.first.is_promoted());
    assert!(!r.second.is_promoted());
    assert_eq!(r.result.unwrap().qube_dims(), Some(vec![2, 3]));
}
