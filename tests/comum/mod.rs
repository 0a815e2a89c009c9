// tests/comum/mod.rs
//
// Fixtures compartilhadas pelos testes de integração. Inserem dados direto
// via sqlx, sem passar pela camada HTTP.

#![allow(dead_code)]

use std::str::FromStr;

use bigdecimal::BigDecimal;
use sqlx::PgPool;

/// Atalho para construir um BigDecimal a partir de um literal.
pub fn dec(valor: &str) -> BigDecimal {
    BigDecimal::from_str(valor).unwrap()
}

pub async fn criar_usuario(pool: &PgPool, nome: &str) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO usuarios (nome, email, senha_hash) VALUES ($1, $2, 'hash-de-teste') RETURNING id",
    )
    .bind(nome)
    .bind(format!("{}@teste.com", nome))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn criar_produto(pool: &PgPool, nome: &str, preco: &str, estoque: i32) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO produtos (nome, descricao, preco, estoque) VALUES ($1, '', $2, $3) RETURNING id",
    )
    .bind(nome)
    .bind(dec(preco))
    .bind(estoque)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn estoque_de(pool: &PgPool, produto_id: i32) -> i32 {
    sqlx::query_scalar("SELECT estoque FROM produtos WHERE id = $1")
        .bind(produto_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn contar_itens_carrinho(pool: &PgPool, usuario_id: i32) -> i64 {
    sqlx::query_scalar(
        "SELECT count(*) FROM carrinho_itens ci \
         JOIN carrinhos c ON c.id = ci.carrinho_id \
         WHERE c.usuario_id = $1",
    )
    .bind(usuario_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn contar_vendas(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT count(*) FROM vendas")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn contar_itens_venda(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT count(*) FROM venda_itens")
        .fetch_one(pool)
        .await
        .unwrap()
}
