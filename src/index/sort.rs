use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

use crate::index::model::MISC_YEAR;

/// 自然排序：连续数字段按数值比较（"2" < "10"），其余逐字符、大小写不敏感。
/// 完全同形时回退到原始字节序，保证全序（排序结果与读取顺序无关）。
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let av: Vec<char> = a.nfc().collect();
    let bv: Vec<char> = b.nfc().collect();
    let (mut i, mut j) = (0, 0);

    while i < av.len() && j < bv.len() {
        if av[i].is_ascii_digit() && bv[j].is_ascii_digit() {
            let (na, ni) = take_number(&av, i);
            let (nb, nj) = take_number(&bv, j);
            match na.cmp(&nb) {
                Ordering::Equal => {
                    i = ni;
                    j = nj;
                }
                ord => return ord,
            }
        } else {
            let ca = fold(av[i]);
            let cb = fold(bv[j]);
            match ca.cmp(&cb) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                ord => return ord,
            }
        }
    }

    match (av.len() - i).cmp(&(bv.len() - j)) {
        Ordering::Equal => a.cmp(b),
        ord => ord,
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn take_number(chars: &[char], start: usize) -> (u128, usize) {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    let value = chars[start..end]
        .iter()
        .collect::<String>()
        .parse::<u128>()
        .unwrap_or(u128::MAX);
    (value, end)
}

/// YearGroup 排序：
/// - "Misc" 哨兵永远最前（显式分支，不依赖稳定排序的插入顺序）
/// - 双方都是数字年份时降序（最近年份在前）
/// - 数字年份排在非数字标签之前
/// - 非数字标签之间按字典序升序
pub fn year_cmp(a: &str, b: &str) -> Ordering {
    if a == MISC_YEAR || b == MISC_YEAR {
        return (b == MISC_YEAR).cmp(&(a == MISC_YEAR));
    }
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => y.cmp(&x),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// 优先榜排序：榜内按榜序，榜内整体在榜外之前，榜外之间字典序升序
pub fn priority_cmp(a: &str, b: &str, priority: &[String]) -> Ordering {
    let ia = priority.iter().position(|p| p == a);
    let ib = priority.iter().position(|p| p == b);
    match (ia, ib) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
