use std::ops::BitXor;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum LBool {
    False = 0,
    True = 1,
    Undef = 2,
}

impl LBool {
    #[inline]
    pub fn is_undef(self) -> bool {
        (self as u8) > 1
    }

    #[inline]
    pub fn bool(self) -> Option<bool> {
        match self {
            LBool::False => Some(false),
            LBool::True => Some(true),
            LBool::Undef => None,
        }
    }
}

impl From<bool> for LBool {
    fn from(b: bool) -> Self {
        if b {
            LBool::True
        } else {
            LBool::False
        }
    }
}

// LBool ^ bool
impl BitXor<bool> for LBool {
    type Output = LBool;

    fn bitxor(self, rhs: bool) -> Self::Output {
        match self {
            LBool::False => LBool::from(rhs),
            LBool::True => LBool::from(!rhs),
            LBool::Undef => LBool::Undef,
        }
    }
}
