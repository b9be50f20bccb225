//! The five-member particle fixture.
//!
//! | index | name      | type                     |
//! |-------|-----------|--------------------------|
//! | 0     | `tensor3` | `f32` `[3][2][4]`        |
//! | 1     | `flag`    | `i32`                    |
//! | 2     | `tensor4` | `f32` `[3][2][4][3]`     |
//! | 3     | `vec1`    | `f64` `[3]`              |
//! | 4     | `mat2`    | `f64` `[3][2]`           |

use flock_core::{Index, Orientation};
use flock_slice::{AoSoA, FieldSlice};

pub const DIM_1: usize = 3;
pub const DIM_2: usize = 2;
pub const DIM_3: usize = 4;
pub const DIM_4: usize = 3;

pub type Tensor3 = [[[f32; DIM_3]; DIM_2]; DIM_1];
pub type Tensor4 = [[[[f32; DIM_4]; DIM_3]; DIM_2]; DIM_1];
pub type Vec1 = [f64; DIM_1];
pub type Mat2 = [[f64; DIM_2]; DIM_1];

pub const TENSOR3: usize = 0;
pub const FLAG: usize = 1;
pub const TENSOR4: usize = 2;
pub const VEC1: usize = 3;
pub const MAT2: usize = 4;

/// Build the fixture collection with `n` zeroed particles.
pub fn fixture_aosoa<const V: usize>(n: usize, orientation: Orientation) -> AoSoA<V> {
    AoSoA::<V>::builder()
        .member::<Tensor3>("tensor3")
        .member::<i32>("flag")
        .member::<Tensor4>("tensor4")
        .member::<Vec1>("vec1")
        .member::<Mat2>("mat2")
        .orientation(orientation)
        .build(n)
        .expect("fixture schema is valid")
}

/// Scalars from which every element value of one pass is derived.
///
/// `tensor3[i][j][k] = fval·(i+j+k)`, `flag = ival`,
/// `tensor4[i][j][k][l] = fval·(i+j+k+l)`, `vec1[i] = dval·i`,
/// `mat2[i][j] = dval·(i+j)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixtureValues {
    pub fval: f32,
    pub dval: f64,
    pub ival: i32,
}

impl FixtureValues {
    pub fn new(fval: f32, dval: f64, ival: i32) -> Self {
        Self { fval, dval, ival }
    }

    pub fn tensor3(&self, i: usize, j: usize, k: usize) -> f32 {
        self.fval * (i + j + k) as f32
    }

    pub fn tensor4(&self, i: usize, j: usize, k: usize, l: usize) -> f32 {
        self.fval * (i + j + k + l) as f32
    }

    pub fn vec1(&self, i: usize) -> f64 {
        self.dval * i as f64
    }

    pub fn mat2(&self, i: usize, j: usize) -> f64 {
        self.dval * (i + j) as f64
    }
}

/// Default-access slices of every fixture member.
#[derive(Clone, Copy, Debug)]
pub struct FixtureSlices<'a, const V: usize> {
    pub tensor3: FieldSlice<'a, Tensor3, V>,
    pub flag: FieldSlice<'a, i32, V>,
    pub tensor4: FieldSlice<'a, Tensor4, V>,
    pub vec1: FieldSlice<'a, Vec1, V>,
    pub mat2: FieldSlice<'a, Mat2, V>,
}

impl<'a, const V: usize> FixtureSlices<'a, V> {
    pub fn new(aosoa: &'a AoSoA<V>) -> Self {
        Self {
            tensor3: aosoa.slice(TENSOR3).expect("tensor3 slice"),
            flag: aosoa.slice(FLAG).expect("flag slice"),
            tensor4: aosoa.slice(TENSOR4).expect("tensor4 slice"),
            vec1: aosoa.slice(VEC1).expect("vec1 slice"),
            mat2: aosoa.slice(MAT2).expect("mat2 slice"),
        }
    }

    /// Write one pass of values to particle `p`.
    pub fn write_particle(&self, p: usize, values: &FixtureValues) {
        self.write_lane(Index::<V>::s(p), Index::<V>::i(p), values);
    }

    /// Write one pass of values to struct `s`, lane `lane`.
    pub fn write_lane(&self, s: usize, lane: usize, values: &FixtureValues) {
        for i in 0..DIM_1 {
            for j in 0..DIM_2 {
                for k in 0..DIM_3 {
                    self.tensor3.access(s, lane, [i, j, k]).set(values.tensor3(i, j, k));
                    for l in 0..DIM_4 {
                        self.tensor4
                            .access(s, lane, [i, j, k, l])
                            .set(values.tensor4(i, j, k, l));
                    }
                }
                self.mat2.access(s, lane, [i, j]).set(values.mat2(i, j));
            }
            self.vec1.access(s, lane, [i]).set(values.vec1(i));
        }
        self.flag.access(s, lane, []).set(values.ival);
    }

    /// Assert that particle `p` holds exactly `values`.
    pub fn check_particle(&self, p: usize, values: &FixtureValues) {
        for i in 0..DIM_1 {
            for j in 0..DIM_2 {
                for k in 0..DIM_3 {
                    assert_eq!(
                        self.tensor3.at(p, [i, j, k]).get(),
                        values.tensor3(i, j, k),
                        "tensor3 particle {p} [{i}][{j}][{k}]"
                    );
                    for l in 0..DIM_4 {
                        assert_eq!(
                            self.tensor4.at(p, [i, j, k, l]).get(),
                            values.tensor4(i, j, k, l),
                            "tensor4 particle {p} [{i}][{j}][{k}][{l}]"
                        );
                    }
                }
                assert_eq!(
                    self.mat2.at(p, [i, j]).get(),
                    values.mat2(i, j),
                    "mat2 particle {p} [{i}][{j}]"
                );
            }
            assert_eq!(
                self.vec1.at(p, [i]).get(),
                values.vec1(i),
                "vec1 particle {p} [{i}]"
            );
        }
        assert_eq!(self.flag.at(p, []).get(), values.ival, "flag particle {p}");
    }

    /// Assert that every particle holds exactly `values`.
    pub fn check_all(&self, values: &FixtureValues) {
        for p in 0..self.flag.num_particle() {
            self.check_particle(p, values);
        }
    }
}
