//! # 元素周期表
//!
//! Gaussian 几何表只给出原子序数，这里映射为元素符号。
//!
//! ## 依赖关系
//! - 被 `parsers/gaussian.rs` 使用

const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// 虚原子 / ghost 原子的符号
pub const DUMMY_SYMBOL: &str = "X";

/// 原子序数 -> 元素符号；0 与负数（虚原子）返回 `X`，越界返回 None
pub fn symbol_for(atomic_number: i64) -> Option<&'static str> {
    if atomic_number <= 0 {
        return Some(DUMMY_SYMBOL);
    }
    SYMBOLS.get(atomic_number as usize - 1).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(symbol_for(1), Some("H"));
        assert_eq!(symbol_for(6), Some("C"));
        assert_eq!(symbol_for(118), Some("Og"));
        assert_eq!(symbol_for(0), Some("X"));
        assert_eq!(symbol_for(119), None);
    }
}
