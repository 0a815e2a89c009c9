// tests/vendas_test.rs
//
// Testes de integração do motor de vendas: fechamento do carrinho,
// cancelamento com restituição de estoque, conclusão e consultas.

mod comum;

use comum::{
    contar_itens_carrinho, contar_itens_venda, contar_vendas, criar_produto, criar_usuario, dec,
    estoque_de,
};
use lojinha::carrinho::carrinho_service as carrinho;
use lojinha::shared::erros::ErroLoja;
use lojinha::vendas::vendas_service as vendas;
use lojinha::vendas::vendas_structs::StatusVenda;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn fechamento_cria_venda_e_debita_estoque(pool: PgPool) {
    let usuario_id = criar_usuario(&pool, "ana").await;
    let caneca = criar_produto(&pool, "Caneca", "10.00", 5).await;
    let adesivo = criar_produto(&pool, "Adesivo", "5.00", 4).await;

    carrinho::adicionar_item(&pool, usuario_id, caneca, 2).await.unwrap();
    carrinho::adicionar_item(&pool, usuario_id, adesivo, 1).await.unwrap();

    let venda = vendas::criar_venda(&pool, usuario_id).await.unwrap();

    assert_eq!(venda.usuario_id, usuario_id);
    assert_eq!(venda.status, StatusVenda::Pendente);
    assert_eq!(venda.total, dec("25.00"));
    assert_eq!(venda.itens.len(), 2);

    let item_caneca = venda.itens.iter().find(|i| i.produto_id == caneca).unwrap();
    assert_eq!(item_caneca.quantidade, 2);
    assert_eq!(item_caneca.preco_unitario, dec("10.00"));
    let item_adesivo = venda.itens.iter().find(|i| i.produto_id == adesivo).unwrap();
    assert_eq!(item_adesivo.preco_unitario, dec("5.00"));

    // Estoque debitado e carrinho esvaziado (mas não destruído)
    assert_eq!(estoque_de(&pool, caneca).await, 3);
    assert_eq!(estoque_de(&pool, adesivo).await, 3);
    assert_eq!(contar_itens_carrinho(&pool, usuario_id).await, 0);
    let visao = carrinho::buscar_carrinho(&pool, usuario_id).await.unwrap();
    assert!(visao.itens.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn preco_do_item_fica_congelado_apos_a_venda(pool: PgPool) {
    let usuario_id = criar_usuario(&pool, "bia").await;
    let produto_id = criar_produto(&pool, "Caneca", "10.00", 5).await;

    carrinho::adicionar_item(&pool, usuario_id, produto_id, 2).await.unwrap();
    let venda = vendas::criar_venda(&pool, usuario_id).await.unwrap();

    // O preço do produto muda depois da venda
    sqlx::query("UPDATE produtos SET preco = $1 WHERE id = $2")
        .bind(dec("99.00"))
        .bind(produto_id)
        .execute(&pool)
        .await
        .unwrap();

    let relida = vendas::buscar_venda(&pool, venda.id, usuario_id, false).await.unwrap();
    assert_eq!(relida.itens[0].preco_unitario, dec("10.00"));
    assert_eq!(relida.total, dec("20.00"));
}

#[sqlx::test(migrations = "./migrations")]
async fn fechamento_sem_estoque_nao_persiste_nada(pool: PgPool) {
    let usuario_id = criar_usuario(&pool, "caio").await;
    let caneca = criar_produto(&pool, "Caneca", "10.00", 10).await;
    let adesivo = criar_produto(&pool, "Adesivo", "5.00", 10).await;

    carrinho::adicionar_item(&pool, usuario_id, caneca, 2).await.unwrap();
    carrinho::adicionar_item(&pool, usuario_id, adesivo, 4).await.unwrap();

    // O estoque do adesivo cai por fora depois que o item já estava no
    // carrinho (o caminho otimista permite isso)
    sqlx::query("UPDATE produtos SET estoque = 3 WHERE id = $1")
        .bind(adesivo)
        .execute(&pool)
        .await
        .unwrap();

    let resultado = vendas::criar_venda(&pool, usuario_id).await;
    match resultado {
        Err(ErroLoja::EstoqueInsuficiente { disponivel, solicitado, produto }) => {
            assert_eq!(produto, "Adesivo");
            assert_eq!(disponivel, 3);
            assert_eq!(solicitado, 4);
        }
        outro => panic!("esperava EstoqueInsuficiente, obtive {:?}", outro.err()),
    }

    // Nada foi persistido: nem venda, nem itens, nem débito, nem limpeza
    assert_eq!(contar_vendas(&pool).await, 0);
    assert_eq!(contar_itens_venda(&pool).await, 0);
    assert_eq!(estoque_de(&pool, caneca).await, 10);
    assert_eq!(estoque_de(&pool, adesivo).await, 3);
    assert_eq!(contar_itens_carrinho(&pool, usuario_id).await, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn fechamento_de_carrinho_vazio_falha(pool: PgPool) {
    let usuario_id = criar_usuario(&pool, "dani").await;

    // Sem nenhuma linha de carrinho
    let resultado = vendas::criar_venda(&pool, usuario_id).await;
    assert!(matches!(resultado, Err(ErroLoja::CarrinhoVazio)));

    // Com carrinho criado porém vazio: mesmo erro
    carrinho::buscar_carrinho(&pool, usuario_id).await.unwrap();
    let resultado = vendas::criar_venda(&pool, usuario_id).await;
    assert!(matches!(resultado, Err(ErroLoja::CarrinhoVazio)));
}

#[sqlx::test(migrations = "./migrations")]
async fn cancelamento_devolve_o_estoque_uma_unica_vez(pool: PgPool) {
    let usuario_id = criar_usuario(&pool, "edu").await;
    let produto_id = criar_produto(&pool, "Caneca", "10.00", 5).await;

    carrinho::adicionar_item(&pool, usuario_id, produto_id, 3).await.unwrap();
    let venda = vendas::criar_venda(&pool, usuario_id).await.unwrap();
    assert_eq!(estoque_de(&pool, produto_id).await, 2);

    let cancelada = vendas::cancelar_venda(&pool, venda.id, usuario_id, false).await.unwrap();
    assert_eq!(cancelada.status, StatusVenda::Cancelada);
    assert_eq!(estoque_de(&pool, produto_id).await, 5);

    // Cancelar de novo não restitui em dobro
    let resultado = vendas::cancelar_venda(&pool, venda.id, usuario_id, false).await;
    assert!(matches!(resultado, Err(ErroLoja::EstadoInvalido)));
    assert_eq!(estoque_de(&pool, produto_id).await, 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn cancelamento_exige_dono_ou_admin(pool: PgPool) {
    let dona = criar_usuario(&pool, "fabi").await;
    let intruso = criar_usuario(&pool, "gil").await;
    let produto_id = criar_produto(&pool, "Caneca", "10.00", 5).await;

    carrinho::adicionar_item(&pool, dona, produto_id, 1).await.unwrap();
    let venda = vendas::criar_venda(&pool, dona).await.unwrap();

    let resultado = vendas::cancelar_venda(&pool, venda.id, intruso, false).await;
    assert!(matches!(resultado, Err(ErroLoja::NaoAutorizado)));
    // A recusa não mexe em nada
    assert_eq!(estoque_de(&pool, produto_id).await, 4);

    // Um administrador pode cancelar a venda de qualquer usuário
    let cancelada = vendas::cancelar_venda(&pool, venda.id, intruso, true).await.unwrap();
    assert_eq!(cancelada.status, StatusVenda::Cancelada);
}

#[sqlx::test(migrations = "./migrations")]
async fn venda_concluida_nao_pode_ser_cancelada(pool: PgPool) {
    let usuario_id = criar_usuario(&pool, "heitor").await;
    let produto_id = criar_produto(&pool, "Caneca", "10.00", 5).await;

    carrinho::adicionar_item(&pool, usuario_id, produto_id, 2).await.unwrap();
    let venda = vendas::criar_venda(&pool, usuario_id).await.unwrap();

    let concluida = vendas::concluir_venda(&pool, venda.id).await.unwrap();
    assert_eq!(concluida.status, StatusVenda::Concluida);

    let resultado = vendas::cancelar_venda(&pool, venda.id, usuario_id, false).await;
    assert!(matches!(resultado, Err(ErroLoja::EstadoInvalido)));
    // O estoque segue debitado
    assert_eq!(estoque_de(&pool, produto_id).await, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn concluir_so_vale_para_venda_pendente(pool: PgPool) {
    let usuario_id = criar_usuario(&pool, "iara").await;
    let produto_id = criar_produto(&pool, "Caneca", "10.00", 5).await;

    carrinho::adicionar_item(&pool, usuario_id, produto_id, 1).await.unwrap();
    let venda = vendas::criar_venda(&pool, usuario_id).await.unwrap();

    vendas::concluir_venda(&pool, venda.id).await.unwrap();
    let resultado = vendas::concluir_venda(&pool, venda.id).await;
    assert!(matches!(resultado, Err(ErroLoja::EstadoInvalido)));

    let resultado = vendas::concluir_venda(&pool, 9999).await;
    assert!(matches!(resultado, Err(ErroLoja::VendaNaoEncontrada)));
}

#[sqlx::test(migrations = "./migrations")]
async fn detalhe_da_venda_respeita_a_autorizacao(pool: PgPool) {
    let dona = criar_usuario(&pool, "joana").await;
    let intruso = criar_usuario(&pool, "kleber").await;
    let produto_id = criar_produto(&pool, "Caneca", "10.00", 5).await;

    carrinho::adicionar_item(&pool, dona, produto_id, 1).await.unwrap();
    let venda = vendas::criar_venda(&pool, dona).await.unwrap();

    let resultado = vendas::buscar_venda(&pool, venda.id, intruso, false).await;
    assert!(matches!(resultado, Err(ErroLoja::NaoAutorizado)));

    let pela_dona = vendas::buscar_venda(&pool, venda.id, dona, false).await.unwrap();
    assert_eq!(pela_dona.nome_usuario, "joana");

    let pelo_admin = vendas::buscar_venda(&pool, venda.id, intruso, true).await.unwrap();
    assert_eq!(pelo_admin.id, venda.id);

    let resultado = vendas::buscar_venda(&pool, 9999, dona, true).await;
    assert!(matches!(resultado, Err(ErroLoja::VendaNaoEncontrada)));
}

#[sqlx::test(migrations = "./migrations")]
async fn listagem_ordena_por_data_com_desempate_por_id(pool: PgPool) {
    let usuario_id = criar_usuario(&pool, "lia").await;

    // Insere vendas com datas controladas; duas empatadas no mesmo instante
    let mut ids = Vec::new();
    for (data, total) in [
        ("2024-01-10T10:00:00Z", "10.00"),
        ("2024-01-12T10:00:00Z", "20.00"),
        ("2024-01-12T10:00:00Z", "30.00"),
        ("2024-01-11T10:00:00Z", "40.00"),
    ] {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO vendas (usuario_id, data, total) VALUES ($1, $2::timestamptz, $3) RETURNING id",
        )
        .bind(usuario_id)
        .bind(data)
        .bind(dec(total))
        .fetch_one(&pool)
        .await
        .unwrap();
        ids.push(id);
    }

    let todas = vendas::listar_vendas(&pool, Some(1), Some(10)).await.unwrap();
    let ordem: Vec<i32> = todas.iter().map(|v| v.id).collect();
    // Mais recentes primeiro; empate do dia 12 resolvido pelo id ascendente
    assert_eq!(ordem, vec![ids[1], ids[2], ids[3], ids[0]]);

    // Paginação estável
    let primeira_pagina = vendas::listar_vendas(&pool, Some(1), Some(2)).await.unwrap();
    let segunda_pagina = vendas::listar_vendas(&pool, Some(2), Some(2)).await.unwrap();
    assert_eq!(primeira_pagina.iter().map(|v| v.id).collect::<Vec<_>>(), vec![ids[1], ids[2]]);
    assert_eq!(segunda_pagina.iter().map(|v| v.id).collect::<Vec<_>>(), vec![ids[3], ids[0]]);

    // Listagem por usuário vem da mais recente para a mais antiga
    let minhas = vendas::vendas_do_usuario(&pool, usuario_id).await.unwrap();
    assert_eq!(minhas.len(), 4);
    assert_eq!(minhas[0].id, ids[1]);
    assert_eq!(minhas[3].id, ids[0]);
}
