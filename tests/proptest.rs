use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::rc::Rc;
use strategy_deque::{BoundedStrategy, Deque, Error, StupidStrategy};

fn contents<T: Clone>(d: &Deque<T>) -> Vec<T> {
    d.iter_front().cloned().collect()
}

proptest! {
    #[test]
    fn random_push_and_pop(
        pushes in proptest::collection::vec(any::<bool>(), 0..64),
        pops in proptest::collection::vec(any::<bool>(), 0..64)
    ) {
        let s = Rc::new(StupidStrategy::new());
        let mut l: Deque<usize> = Deque::new(s.clone());

        let len = pushes.len();

        for (p,v) in pushes.into_iter().zip(0..len) {
            if p {
                l.push_front(v).unwrap();
            } else {
                l.push_back(v).unwrap();
            }
        }

        let mut popped = 0;
        for p in pops {
            let r = if p { l.pop_front() } else { l.pop_back() };
            match r {
                Ok(_) => popped += 1,
                Err(e) => {
                    prop_assert_eq!(Error::Empty, e);
                }
            }
        }

        prop_assert_eq!(len - popped, l.len());
        prop_assert_eq!(l.len(), s.outstanding());

        drop(l);
        prop_assert_eq!(0, s.outstanding());
    }
}

proptest! {
    #[test]
    fn random_interleaved_push_and_pop(
        action in proptest::collection::vec(any::<usize>(), 0..64)
    ){
        let mut l: Deque<usize> = Deque::new(Rc::new(StupidStrategy::new()));
        let mut model: VecDeque<usize> = VecDeque::new();

        for a in action {
            match a & 0x03 {
                0x00 => {
                    l.push_front(a).unwrap();
                    model.push_front(a);
                },
                0x01 => {
                    l.push_back(a).unwrap();
                    model.push_back(a);
                },
                0x02 => {
                    prop_assert_eq!(model.pop_front().ok_or(Error::Empty), l.pop_front());
                },
                0x03 => {
                    prop_assert_eq!(model.pop_back().ok_or(Error::Empty), l.pop_back());
                },
                _ => unreachable!(),
            }

            prop_assert_eq!(model.is_empty(), l.is_empty());
            prop_assert_eq!(model.iter().collect::<Vec<_>>(), l.iter_front().collect::<Vec<_>>());
            prop_assert_eq!(model.iter().rev().collect::<Vec<_>>(), l.iter_back().collect::<Vec<_>>());
        }
    }
}

proptest! {
    #[test]
    fn random_change_allocator(
        seed in any::<u64>(),
        pushes in proptest::collection::vec(any::<u32>(), 0..32),
        moves in 1..8usize,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut strategies: Vec<Rc<StupidStrategy>> =
            (0..4).map(|_| Rc::new(StupidStrategy::new())).collect();

        let mut list = Deque::new(strategies[0].clone());
        for p in &pushes {
            list.push_back(*p).unwrap();
            // Leave holes on the slot free list.
            if rng.gen_range(0..4) == 0 {
                list.push_front(0).unwrap();
                list.pop_front().unwrap();
            }
        }

        for _ in 0..moves {
            strategies.shuffle(&mut rng);
            let target = strategies[0].clone();
            list.change_allocator(target.clone()).unwrap();

            prop_assert_eq!(&pushes, &contents(&list));
            prop_assert_eq!(pushes.len(), target.outstanding());
            for other in &strategies[1..] {
                prop_assert_eq!(0, other.outstanding());
            }
        }
    }
}

proptest! {
    #[test]
    fn copies_are_independent(
        items in proptest::collection::vec(any::<i16>(), 0..32),
        extra in any::<i16>(),
    ) {
        let s1 = Rc::new(StupidStrategy::new());
        let s2 = Rc::new(StupidStrategy::new());
        let source = Deque::from_iter_in(items.clone(), s1.clone()).unwrap();

        let mut same = source.try_clone().unwrap();
        let mut other = source.try_clone_in(s2.clone()).unwrap();
        let mut assigned = Deque::from_iter_in(vec![extra; 3], s2.clone()).unwrap();
        assigned.assign_from(&source).unwrap();

        prop_assert_eq!(&source, &same);
        prop_assert_eq!(&source, &other);
        prop_assert_eq!(&source, &assigned);
        prop_assert_eq!(3 * items.len(), s1.outstanding());
        prop_assert_eq!(items.len(), s2.outstanding());

        same.push_back(extra).unwrap();
        other.push_front(extra).unwrap();
        assigned.clear();

        prop_assert_eq!(&items, &contents(&source));
    }
}

proptest! {
    #[test]
    fn bounded_pushes_stop_at_limit(
        limit in 0..16usize,
        pushes in proptest::collection::vec(any::<bool>(), 0..32),
    ) {
        let s = Rc::new(BoundedStrategy::new(limit));
        let mut l = Deque::new(s.clone());
        let mut model = VecDeque::new();

        for (i, front) in pushes.iter().enumerate() {
            let r = if *front { l.push_front(i) } else { l.push_back(i) };
            if model.len() < limit {
                prop_assert!(r.is_ok());
                if *front { model.push_front(i) } else { model.push_back(i) }
            } else {
                let oom = matches!(r, Err(Error::OutOfMemory { .. }));
                prop_assert!(oom);
            }
        }

        prop_assert_eq!(model.into_iter().collect::<Vec<_>>(), contents(&l));
        prop_assert_eq!(l.len(), s.outstanding());
    }
}
